//! Two-pass assembler.
//!
//! Pass 1 walks the token stream to assign one word of address space per
//! instruction or `data` directive and to bind every label to the running
//! counter. Pass 2 re-parses the identical stream from the start, resolves
//! memory operands through the symbol table and emits encoded words. Both
//! passes advance the counter in lockstep, so the address recorded for a
//! label in pass 1 is exactly the index at which pass 2 emits the word
//! following its definition site.

use thiserror::Error;
use tracing::debug;

use crate::codec;
use crate::isa::{self, ArgKind, OpDesc, NUM_REGS};
use crate::lexer::{snippet, Cursor, LexError, Token};

/// Output buffer capacity, in words.
pub const MAX_PROGRAM_WORDS: usize = 1 << 20;

#[derive(Error, Debug)]
pub enum AsmError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error("pass {pass}, invalid line: {snippet:?}")]
    InvalidLine { pass: u8, snippet: String },
    #[error("newline expected: {0:?}")]
    ExpectedNewline(String),
    #[error("identifier expected: {0:?}")]
    ExpectedIdent(String),
    #[error("comma expected: {0:?}")]
    ExpectedComma(String),
    #[error("number expected: {0:?}")]
    ExpectedNumber(String),
    #[error("invalid register: {0:?}")]
    InvalidRegister(String),
    #[error("symbol '{0}' not defined")]
    UndefinedSymbol(String),
    #[error("address {0} does not fit the argument field")]
    AddressOutOfRange(i64),
    #[error("immediate {0} does not fit the argument field")]
    ImmediateOutOfRange(i64),
    #[error("program exceeds {MAX_PROGRAM_WORDS} words")]
    ProgramTooLarge,
}

/// Compile `src` to a flat word buffer. Any fault aborts the whole
/// assembly; nothing is emitted on error.
pub fn assemble(src: &str) -> Result<Vec<i64>, AsmError> {
    let mut asm = Assembler::new(src);
    asm.pass(Pass::First)?;
    asm.pass(Pass::Second)?;
    debug!(words = asm.out.len(), symbols = asm.symtab.len(), "assembly complete");
    Ok(asm.out)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    First,
    Second,
}

impl Pass {
    fn number(self) -> u8 {
        match self {
            Pass::First => 1,
            Pass::Second => 2,
        }
    }
}

struct Sym {
    name: String,
    addr: i64,
}

/// All assembly state, constructed fresh per `assemble` call.
struct Assembler<'a> {
    src: &'a str,
    symtab: Vec<Sym>,
    out: Vec<i64>,
    counter: usize,
}

impl<'a> Assembler<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, symtab: Vec::new(), out: Vec::new(), counter: 0 }
    }

    fn pass(&mut self, pass: Pass) -> Result<(), AsmError> {
        self.counter = 0;
        let mut cur = Cursor::new(self.src);
        while !cur.at_end() {
            let line_start = cur;
            if !self.parse_line(&mut cur, pass)? {
                return Err(AsmError::InvalidLine {
                    pass: pass.number(),
                    snippet: snippet(line_start.rest()),
                });
            }
        }
        Ok(())
    }

    /// `line := [label] (instruction | data)? (newline | end)`. Returns
    /// false only if the line matches no rule at all.
    fn parse_line(&mut self, cur: &mut Cursor<'a>, pass: Pass) -> Result<bool, AsmError> {
        if self.parse_label(cur, pass)? {
            // Optional instruction or data on the label's line.
            if !self.parse_instruction(cur, pass)? {
                self.parse_data(cur, pass)?;
            }
            self.expect_line_end(cur)?;
            return Ok(true);
        }

        if self.parse_instruction(cur, pass)? || self.parse_data(cur, pass)? {
            self.expect_line_end(cur)?;
            return Ok(true);
        }

        // Blank line.
        let mut probe = *cur;
        if matches!(probe.eat()?, Token::Newline | Token::End) {
            *cur = probe;
            return Ok(true);
        }
        Ok(false)
    }

    /// `label := identifier ':'`, needs two tokens of lookahead.
    fn parse_label(&mut self, cur: &mut Cursor<'a>, pass: Pass) -> Result<bool, AsmError> {
        let mut probe = *cur;
        let first = probe.eat()?;
        let second = probe.eat()?;
        let (Token::Ident(name), Token::Colon) = (first, second) else {
            return Ok(false);
        };
        *cur = probe;

        if pass == Pass::First {
            debug!(label = name, addr = self.counter, "binding symbol");
            self.symtab.push(Sym { name: name.to_string(), addr: self.counter as i64 });
        }
        Ok(true)
    }

    fn parse_instruction(&mut self, cur: &mut Cursor<'a>, pass: Pass) -> Result<bool, AsmError> {
        let Token::Ident(name) = cur.peek()? else {
            return Ok(false);
        };
        let Some(desc) = isa::by_mnemonic(name) else {
            return Ok(false);
        };
        cur.eat()?;

        match pass {
            Pass::First => {
                self.reserve_word()?;
                // Syntax and register-range checks only; memory labels may
                // be defined later in the source.
                if desc.has_reg {
                    self.expect_register(cur)?;
                }
                if desc.has_reg && desc.arg != ArgKind::None {
                    self.expect_comma(cur)?;
                }
                match desc.arg {
                    ArgKind::None => {}
                    ArgKind::Reg => {
                        self.expect_register(cur)?;
                    }
                    ArgKind::Mem => {
                        self.expect_ident(cur)?;
                    }
                    ArgKind::Immediate => {
                        self.expect_number(cur)?;
                    }
                }
            }
            Pass::Second => {
                let word = self.encode_instruction(cur, desc)?;
                self.out.push(word);
                self.counter += 1;
            }
        }
        Ok(true)
    }

    fn encode_instruction(
        &mut self,
        cur: &mut Cursor<'a>,
        desc: &OpDesc,
    ) -> Result<i64, AsmError> {
        let mut reg = 0i64;
        let mut arg = 0i64;

        if desc.has_reg {
            reg = self.expect_register(cur)?;
        }
        if desc.has_reg && desc.arg != ArgKind::None {
            self.expect_comma(cur)?;
        }
        match desc.arg {
            ArgKind::None => {}
            ArgKind::Reg => {
                arg = self.expect_register(cur)?;
            }
            ArgKind::Mem => {
                let name = self.expect_ident(cur)?;
                arg = self.symtab_lookup(name)?;
                if !codec::arg_fits(arg) {
                    return Err(AsmError::AddressOutOfRange(arg));
                }
            }
            ArgKind::Immediate => {
                arg = self.expect_number(cur)?;
                if !codec::arg_fits(arg) {
                    return Err(AsmError::ImmediateOutOfRange(arg));
                }
            }
        }
        Ok(codec::encode(desc.op as i64, reg, arg))
    }

    /// `data <signed-int>`: one reserved word, emitted verbatim with no
    /// instruction encoding applied.
    fn parse_data(&mut self, cur: &mut Cursor<'a>, pass: Pass) -> Result<bool, AsmError> {
        let before = *cur;
        let Token::Ident("data") = cur.peek()? else {
            return Ok(false);
        };
        cur.eat()?;

        let Token::Number(value) = cur.eat()? else {
            return Err(AsmError::ExpectedNumber(snippet(before.rest())));
        };
        match pass {
            Pass::First => self.reserve_word()?,
            Pass::Second => {
                self.out.push(value);
                self.counter += 1;
            }
        }
        Ok(true)
    }

    fn reserve_word(&mut self) -> Result<(), AsmError> {
        if self.counter >= MAX_PROGRAM_WORDS {
            return Err(AsmError::ProgramTooLarge);
        }
        self.counter += 1;
        Ok(())
    }

    /// First match wins; duplicate definitions are not rejected.
    fn symtab_lookup(&self, name: &str) -> Result<i64, AsmError> {
        self.symtab
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.addr)
            .ok_or_else(|| AsmError::UndefinedSymbol(name.to_string()))
    }

    fn expect_line_end(&self, cur: &mut Cursor<'a>) -> Result<(), AsmError> {
        let before = *cur;
        match cur.eat()? {
            Token::Newline | Token::End => Ok(()),
            _ => Err(AsmError::ExpectedNewline(snippet(before.rest()))),
        }
    }

    fn expect_ident(&self, cur: &mut Cursor<'a>) -> Result<&'a str, AsmError> {
        let before = *cur;
        match cur.eat()? {
            Token::Ident(name) => Ok(name),
            _ => Err(AsmError::ExpectedIdent(snippet(before.rest()))),
        }
    }

    fn expect_comma(&self, cur: &mut Cursor<'a>) -> Result<(), AsmError> {
        let before = *cur;
        match cur.eat()? {
            Token::Comma => Ok(()),
            _ => Err(AsmError::ExpectedComma(snippet(before.rest()))),
        }
    }

    fn expect_number(&self, cur: &mut Cursor<'a>) -> Result<i64, AsmError> {
        let before = *cur;
        match cur.eat()? {
            Token::Number(n) => Ok(n),
            _ => Err(AsmError::ExpectedNumber(snippet(before.rest()))),
        }
    }

    /// Register operand: `r<N>` with `1 <= N < NUM_REGS`. Returns N, which
    /// is both the encoded register field and the `cpy`-style argument.
    fn expect_register(&self, cur: &mut Cursor<'a>) -> Result<i64, AsmError> {
        let name = self.expect_ident(cur)?;
        register_number(name).ok_or_else(|| AsmError::InvalidRegister(name.to_string()))
    }
}

fn register_number(name: &str) -> Option<i64> {
    let digits = name.strip_prefix('r')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let n: i64 = digits.parse().ok()?;
    (1..NUM_REGS as i64).contains(&n).then_some(n)
}
