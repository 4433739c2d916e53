//! Assembly-source tokenizer. `Cursor` is a copyable view into the
//! source, so `peek` is just `eat` on a copy.

use thiserror::Error;

/// Identifiers longer than this are rejected outright.
pub const MAX_IDENT: usize = 31;

/// How much of the offending input an error message quotes.
const SNIPPET_LEN: usize = 40;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LexError {
    #[error("identifier too long: {0:?}")]
    IdentifierTooLong(String),
    #[error("invalid token: {0:?}")]
    InvalidToken(String),
}

/// First line of `s`, truncated to a printable error snippet.
pub(crate) fn snippet(s: &str) -> String {
    let line = s.split('\n').next().unwrap_or("");
    let mut end = line.len().min(SNIPPET_LEN);
    while !line.is_char_boundary(end) {
        end -= 1;
    }
    line[..end].to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Ident(&'a str),
    Colon,
    Comma,
    Number(i64),
    Newline,
    End,
}

#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    /// Unconsumed input, for error reporting.
    pub fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self, c: char) {
        self.pos += c.len_utf8();
    }

    /// Lookahead without advancing.
    pub fn peek(&self) -> Result<Token<'a>, LexError> {
        let mut probe = *self;
        probe.eat()
    }

    /// Consume and return the next token.
    pub fn eat(&mut self) -> Result<Token<'a>, LexError> {
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() && c != '\n' {
                self.bump(c);
            } else {
                break;
            }
        }

        // Line comment runs through to (but not including) the newline.
        if self.peek_char() == Some('#') {
            while let Some(c) = self.peek_char() {
                if c == '\n' {
                    break;
                }
                self.bump(c);
            }
        }

        let Some(c) = self.peek_char() else {
            return Ok(Token::End);
        };

        match c {
            ':' => {
                self.bump(c);
                Ok(Token::Colon)
            }
            ',' => {
                self.bump(c);
                Ok(Token::Comma)
            }
            '\n' => {
                self.bump(c);
                Ok(Token::Newline)
            }
            '+' | '-' if self.rest()[1..].starts_with(|d: char| d.is_ascii_digit()) => {
                self.bump(c);
                Ok(self.number(if c == '-' { -1 } else { 1 }))
            }
            _ if c.is_ascii_digit() => Ok(self.number(1)),
            _ if c.is_alphanumeric() || c == '_' => self.ident(),
            _ => Err(LexError::InvalidToken(snippet(self.rest()))),
        }
    }

    // Digits accumulate wrapping; range enforcement happens where the
    // value is consumed (immediate fields, register numbers).
    fn number(&mut self, sign: i64) -> Token<'a> {
        let mut val: i64 = 0;
        while let Some(c) = self.peek_char() {
            let Some(d) = c.to_digit(10) else { break };
            val = val.wrapping_mul(10).wrapping_add(d as i64);
            self.bump(c);
        }
        Token::Number(val.wrapping_mul(sign))
    }

    fn ident(&mut self) -> Result<Token<'a>, LexError> {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if c.is_alphanumeric() || c == '_' {
                self.bump(c);
            } else {
                break;
            }
        }
        let id = &self.src[start..self.pos];
        if id.chars().count() > MAX_IDENT {
            return Err(LexError::IdentifierTooLong(snippet(id)));
        }
        Ok(Token::Ident(id))
    }
}
