use anyhow::Result;
use std::io::{BufRead, Write};

/// What the interpreter needs from the host terminal. Implementations
/// other than [`StdConsole`] exist for tests and embedding.
pub trait Console {
    /// Read one line and parse its leading integer. `None` means end of
    /// input, which the interpreter treats as a halt, not an error.
    fn read_number(&mut self) -> Result<Option<i64>>;
    /// Write a value followed by a newline (`put`).
    fn write_number(&mut self, value: i64) -> Result<()>;
    /// Write raw text: the `getp` prompt and the debug dumps.
    fn write_str(&mut self, text: &str) -> Result<()>;
}

/// Process stdin/stdout.
pub struct StdConsole;

impl Console for StdConsole {
    fn read_number(&mut self) -> Result<Option<i64>> {
        let mut line = String::new();
        let n = std::io::stdin().lock().read_line(&mut line)?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(parse_leading_int(&line)))
    }

    fn write_number(&mut self, value: i64) -> Result<()> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{value}")?;
        Ok(())
    }

    fn write_str(&mut self, text: &str) -> Result<()> {
        let mut out = std::io::stdout().lock();
        out.write_all(text.as_bytes())?;
        // The getp prompt has no trailing newline.
        out.flush()?;
        Ok(())
    }
}

/// Leading integer of a line, C `atoi` style: skip leading whitespace,
/// optional sign, then digits; anything else (or no digits) yields 0.
pub fn parse_leading_int(s: &str) -> i64 {
    let s = s.trim_start();
    let (sign, rest) = match s.strip_prefix('-') {
        Some(r) => (-1i64, r),
        None => (1i64, s.strip_prefix('+').unwrap_or(s)),
    };
    let mut val: i64 = 0;
    for c in rest.chars() {
        let Some(d) = c.to_digit(10) else { break };
        val = val.wrapping_mul(10).wrapping_add(d as i64);
    }
    val.wrapping_mul(sign)
}
