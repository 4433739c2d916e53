//! Instruction set: opcode numbers, mnemonics and operand shapes.
//!
//! `TABLE` is the single source of truth shared by the assembler, the
//! interpreter and the disassembler. Entry `i` describes opcode `i`.

use serde::{Deserialize, Serialize};

/// Register file size. Source registers are `r1..r{NUM_REGS-1}`.
pub const NUM_REGS: usize = 8;

// The register field is 4 bits with 0 reserved for "no register".
const _: () = assert!(NUM_REGS <= 15);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Op {
    Stop = 0,
    Get,
    Getp,
    Put,
    Dbgr,
    Dbgm,
    Ld,
    Set,
    Cpy,
    St,
    AddM,
    AddI,
    AddR,
    SubM,
    SubI,
    SubR,
    MulM,
    MulI,
    MulR,
    DivM,
    DivI,
    DivR,
    Jp,
    Jpz,
    Jz,
    Jn,
    Jnz,
    J,
    Nop,
    Yield,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    None,
    Immediate,
    Mem,
    Reg,
}

#[derive(Debug, Clone, Copy)]
pub struct OpDesc {
    pub op: Op,
    pub mnemonic: &'static str,
    pub has_reg: bool,
    pub arg: ArgKind,
}

const fn desc(op: Op, mnemonic: &'static str, has_reg: bool, arg: ArgKind) -> OpDesc {
    OpDesc { op, mnemonic, has_reg, arg }
}

pub const TABLE: &[OpDesc] = &[
    desc(Op::Stop, "stop", false, ArgKind::None),
    desc(Op::Get, "get", true, ArgKind::None),
    desc(Op::Getp, "getp", true, ArgKind::None),
    desc(Op::Put, "put", true, ArgKind::None),
    desc(Op::Dbgr, "dbgr", false, ArgKind::None),
    desc(Op::Dbgm, "dbgm", true, ArgKind::Mem),
    desc(Op::Ld, "ld", true, ArgKind::Mem),
    desc(Op::Set, "set", true, ArgKind::Immediate),
    desc(Op::Cpy, "cpy", true, ArgKind::Reg),
    desc(Op::St, "st", true, ArgKind::Mem),
    desc(Op::AddM, "addm", true, ArgKind::Mem),
    desc(Op::AddI, "addi", true, ArgKind::Immediate),
    desc(Op::AddR, "add", true, ArgKind::Reg),
    desc(Op::SubM, "subm", true, ArgKind::Mem),
    desc(Op::SubI, "subi", true, ArgKind::Immediate),
    desc(Op::SubR, "sub", true, ArgKind::Reg),
    desc(Op::MulM, "mulm", true, ArgKind::Mem),
    desc(Op::MulI, "muli", true, ArgKind::Immediate),
    desc(Op::MulR, "mul", true, ArgKind::Reg),
    desc(Op::DivM, "divm", true, ArgKind::Mem),
    desc(Op::DivI, "divi", true, ArgKind::Immediate),
    desc(Op::DivR, "div", true, ArgKind::Reg),
    desc(Op::Jp, "jp", true, ArgKind::Mem),
    desc(Op::Jpz, "jpz", true, ArgKind::Mem),
    desc(Op::Jz, "jz", true, ArgKind::Mem),
    desc(Op::Jn, "jn", true, ArgKind::Mem),
    desc(Op::Jnz, "jnz", true, ArgKind::Mem),
    desc(Op::J, "j", false, ArgKind::Mem),
    desc(Op::Nop, "nop", false, ArgKind::None),
    desc(Op::Yield, "yield", false, ArgKind::None),
];

// Opcode field is 6 bits.
const _: () = assert!(TABLE.len() <= 1 << 6);

/// Assembler-only mnemonic aliases; the disassembler always prints the
/// `TABLE` spelling.
const ALIASES: &[(&str, Op)] = &[("ldi", Op::Set)];

/// Descriptor for a decoded opcode number, `None` if out of range.
pub fn lookup(code: i64) -> Option<&'static OpDesc> {
    usize::try_from(code).ok().and_then(|i| TABLE.get(i))
}

/// Mnemonic lookup for the assembler, aliases included.
pub fn by_mnemonic(name: &str) -> Option<&'static OpDesc> {
    if let Some(d) = TABLE.iter().find(|d| d.mnemonic == name) {
        return Some(d);
    }
    for (alias, op) in ALIASES {
        if *alias == name {
            return lookup(*op as i64);
        }
    }
    None
}
