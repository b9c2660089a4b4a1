//! Operand tokenizer for move strings.

use std::str::SplitWhitespace;

use crate::core::MoveParseError;
use crate::grid::Coord;

/// Reads typed operands from the tokens following an opcode.
#[derive(Clone, Debug)]
pub struct MoveTokens<'a> {
    op: &'a str,
    rest: SplitWhitespace<'a>,
}

impl<'a> MoveTokens<'a> {
    /// Split off the opcode token.
    pub fn new(text: &'a str) -> Result<Self, MoveParseError> {
        let mut rest = text.split_whitespace();
        let op = rest.next().ok_or(MoveParseError::Empty)?;
        Ok(Self { op, rest })
    }

    /// The opcode token as written.
    #[must_use]
    pub fn opcode(&self) -> &'a str {
        self.op
    }

    fn missing(&self, operand: &'static str) -> MoveParseError {
        MoveParseError::MissingOperand {
            op: self.op.to_string(),
            operand,
        }
    }

    fn bad(&self, operand: &'static str, token: &str) -> MoveParseError {
        MoveParseError::BadOperand {
            op: self.op.to_string(),
            operand,
            token: token.to_string(),
        }
    }

    /// Next raw token.
    pub fn next_word(&mut self, operand: &'static str) -> Result<&'a str, MoveParseError> {
        self.rest.next().ok_or_else(|| self.missing(operand))
    }

    /// Next token as an integer.
    pub fn next_int(&mut self, operand: &'static str) -> Result<i32, MoveParseError> {
        let token = self.next_word(operand)?;
        token.parse().map_err(|_| self.bad(operand, token))
    }

    /// Next two tokens as a column letter and a row number.
    pub fn next_coord(&mut self, operand: &'static str) -> Result<Coord, MoveParseError> {
        let col_token = self.next_word(operand)?;
        let mut chars = col_token.chars();
        let col = match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => c,
            _ => return Err(self.bad(operand, col_token)),
        };
        let row = self.next_int(operand)?;
        Ok(Coord::new(col, row))
    }

    /// Fail if any token is left over.
    pub fn finish(mut self) -> Result<(), MoveParseError> {
        match self.rest.next() {
            Some(extra) => Err(MoveParseError::Trailing(extra.to_string())),
            None => Ok(()),
        }
    }
}
