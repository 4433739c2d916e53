//! Fetch-decode-execute loop.
//!
//! The machine runs while `pc >= 0`; `stop` (and end of input on `get`)
//! parks `pc` at -1, while `yield` leaves `pc` at the next instruction so
//! the caller can resume by calling `run` again with the same state. The
//! word array is owned by the caller and mutated in place by stores.

use anyhow::Error;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::codec;
use crate::io::Console;
use crate::isa::{self, Op, NUM_REGS};

/// `pc` value that marks a halted machine.
pub const HALT_PC: i64 = -1;

#[derive(thiserror::Error, Debug)]
pub enum Trap {
    #[error("illegal instruction {op} at {pc}")]
    IllegalInstruction { pc: i64, op: i64 },
    #[error("register field {field} out of range at {pc}")]
    BadRegister { pc: i64, field: i64 },
    #[error("memory access {addr} out of bounds at {pc}")]
    OutOfBounds { pc: i64, addr: i64 },
    #[error("division by zero at {pc}")]
    DivideByZero { pc: i64 },
    #[error("console error at {pc}: {source}")]
    Console {
        pc: i64,
        #[source]
        source: Error,
    },
}

/// How a `run` call returned control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Exit {
    /// `stop` executed (or `get` hit end of input); `pc` is negative.
    Halted,
    /// `yield` executed; `pc` addresses the next instruction.
    Yielded,
}

/// Outcome of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Yield,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Machine {
    pub pc: i64,
    pub r: [i64; NUM_REGS],
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine {
    pub fn new() -> Self {
        Self { pc: 0, r: [0; NUM_REGS] }
    }

    pub fn halted(&self) -> bool {
        self.pc < 0
    }

    /// Execute until halt or yield.
    pub fn run<C: Console>(&mut self, mem: &mut [i64], con: &mut C) -> Result<Exit, Trap> {
        while self.pc >= 0 {
            if self.step(mem, con)? == Flow::Yield {
                debug!(pc = self.pc, "yielded");
                return Ok(Exit::Yielded);
            }
        }
        debug!("halted");
        Ok(Exit::Halted)
    }

    /// Execute exactly one instruction.
    pub fn step<C: Console>(&mut self, mem: &mut [i64], con: &mut C) -> Result<Flow, Trap> {
        let pc = self.pc;
        let word = *usize::try_from(pc)
            .ok()
            .and_then(|i| mem.get(i))
            .ok_or(Trap::OutOfBounds { pc, addr: pc })?;

        let (code, reg_field, arg) = codec::decode(word);
        let op = isa::lookup(code)
            .map(|d| d.op)
            .ok_or(Trap::IllegalInstruction { pc, op: code })?;
        self.pc = pc + 1;

        match op {
            Op::Stop => self.pc = HALT_PC,

            Op::Get => self.read_into(reg_field, con, pc)?,
            Op::Getp => {
                // Same read as `get`, with a prompt first.
                con.write_str("enter a number: ")
                    .map_err(|source| Trap::Console { pc, source })?;
                self.read_into(reg_field, con, pc)?;
            }
            Op::Put => {
                let v = self.reg(reg_field, pc)?;
                con.write_number(v).map_err(|source| Trap::Console { pc, source })?;
            }
            Op::Dbgr => {
                let mut dump = String::new();
                dump.push_str("--- dbgr -----------------------------\n");
                dump.push_str(&format!("\tpc\t{pc}\n"));
                for (i, v) in self.r.iter().enumerate() {
                    dump.push_str(&format!("\tr{}\t{v}\n", i + 1));
                }
                dump.push_str("--------------------------------------\n");
                con.write_str(&dump).map_err(|source| Trap::Console { pc, source })?;
            }
            Op::Dbgm => {
                let count = self.reg(reg_field, pc)?;
                let mut dump = String::new();
                dump.push_str("--- dbgm -----------------------------\n");
                for addr in arg..arg.saturating_add(count) {
                    dump.push_str(&format!("\t{addr}:\t{}\n", load(mem, addr, pc)?));
                }
                dump.push_str("--------------------------------------\n");
                con.write_str(&dump).map_err(|source| Trap::Console { pc, source })?;
            }

            Op::Ld => *self.reg_mut(reg_field, pc)? = load(mem, arg, pc)?,
            Op::Set => *self.reg_mut(reg_field, pc)? = arg,
            Op::Cpy => *self.reg_mut(reg_field, pc)? = self.reg(arg, pc)?,
            Op::St => *slot(mem, arg, pc)? = self.reg(reg_field, pc)?,

            Op::AddM => self.apply(reg_field, pc, load(mem, arg, pc)?, i64::wrapping_add)?,
            Op::AddI => self.apply(reg_field, pc, arg, i64::wrapping_add)?,
            Op::AddR => self.apply(reg_field, pc, self.reg(arg, pc)?, i64::wrapping_add)?,
            Op::SubM => self.apply(reg_field, pc, load(mem, arg, pc)?, i64::wrapping_sub)?,
            Op::SubI => self.apply(reg_field, pc, arg, i64::wrapping_sub)?,
            Op::SubR => self.apply(reg_field, pc, self.reg(arg, pc)?, i64::wrapping_sub)?,
            Op::MulM => self.apply(reg_field, pc, load(mem, arg, pc)?, i64::wrapping_mul)?,
            Op::MulI => self.apply(reg_field, pc, arg, i64::wrapping_mul)?,
            Op::MulR => self.apply(reg_field, pc, self.reg(arg, pc)?, i64::wrapping_mul)?,
            Op::DivM => self.divide(reg_field, pc, load(mem, arg, pc)?)?,
            Op::DivI => self.divide(reg_field, pc, arg)?,
            Op::DivR => self.divide(reg_field, pc, self.reg(arg, pc)?)?,

            Op::Jp => self.jump_if(reg_field, pc, arg, |v| v > 0)?,
            Op::Jpz => self.jump_if(reg_field, pc, arg, |v| v >= 0)?,
            Op::Jz => self.jump_if(reg_field, pc, arg, |v| v == 0)?,
            Op::Jn => self.jump_if(reg_field, pc, arg, |v| v < 0)?,
            Op::Jnz => self.jump_if(reg_field, pc, arg, |v| v <= 0)?,
            Op::J => self.pc = arg,
            Op::Nop => {}

            Op::Yield => return Ok(Flow::Yield),
        }
        Ok(Flow::Continue)
    }

    /// Register read through the 1-based field (also used for
    /// register-as-argument operands, which carry the same numbering).
    fn reg(&self, field: i64, pc: i64) -> Result<i64, Trap> {
        reg_index(field, pc).map(|i| self.r[i])
    }

    fn reg_mut(&mut self, field: i64, pc: i64) -> Result<&mut i64, Trap> {
        reg_index(field, pc).map(|i| &mut self.r[i])
    }

    fn apply(
        &mut self,
        field: i64,
        pc: i64,
        operand: i64,
        op: fn(i64, i64) -> i64,
    ) -> Result<(), Trap> {
        let r = self.reg_mut(field, pc)?;
        *r = op(*r, operand);
        Ok(())
    }

    fn divide(&mut self, field: i64, pc: i64, operand: i64) -> Result<(), Trap> {
        if operand == 0 {
            return Err(Trap::DivideByZero { pc });
        }
        self.apply(field, pc, operand, i64::wrapping_div)
    }

    fn jump_if(&mut self, field: i64, pc: i64, target: i64, cond: fn(i64) -> bool) -> Result<(), Trap> {
        if cond(self.reg(field, pc)?) {
            // A negative target simply ends the run loop.
            self.pc = target;
        }
        Ok(())
    }

    fn read_into<C: Console>(&mut self, field: i64, con: &mut C, pc: i64) -> Result<(), Trap> {
        match con.read_number().map_err(|source| Trap::Console { pc, source })? {
            Some(v) => *self.reg_mut(field, pc)? = v,
            // End of input is a normal halt, not a fault.
            None => self.pc = HALT_PC,
        }
        Ok(())
    }
}

fn reg_index(field: i64, pc: i64) -> Result<usize, Trap> {
    let idx = field - 1;
    if (0..NUM_REGS as i64).contains(&idx) {
        Ok(idx as usize)
    } else {
        Err(Trap::BadRegister { pc, field })
    }
}

fn load(mem: &[i64], addr: i64, pc: i64) -> Result<i64, Trap> {
    usize::try_from(addr)
        .ok()
        .and_then(|i| mem.get(i))
        .copied()
        .ok_or(Trap::OutOfBounds { pc, addr })
}

fn slot(mem: &mut [i64], addr: i64, pc: i64) -> Result<&mut i64, Trap> {
    usize::try_from(addr)
        .ok()
        .and_then(|i| mem.get_mut(i))
        .ok_or(Trap::OutOfBounds { pc, addr })
}
