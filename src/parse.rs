//! Parser for the textual formula syntax.
//!
//! # Syntax
//!
//! ```text
//! formula  := variable | 'T' | 'F' | '~' formula | '(' formula binop formula ')'
//! binop    := '&' | '|' | '->' | '<->' | '+' | '-&' | '-|'
//! variable := [p-z][0-9]*
//! ```
//!
//! Binary formulas are always parenthesized, so no precedence rules apply.
//! The printer ([`Formula`]'s `Display`) emits exactly this syntax.

use std::fmt;
use std::str::FromStr;

use log::trace;

use crate::formula::{BinaryOp, Formula};

/// Error type for parsing.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ParseError {
    /// Input ended while a formula was expected.
    UnexpectedEnd,
    /// A character that cannot start or continue a formula here.
    UnexpectedChar { pos: usize, ch: char },
    /// An operator position holds something that is not a binary operator.
    UnknownOperator { pos: usize, symbol: String },
    /// A complete formula was parsed but input remains.
    TrailingInput { pos: usize },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnexpectedEnd => write!(f, "Parse error: unexpected end of input"),
            ParseError::UnexpectedChar { pos, ch } => {
                write!(f, "Parse error: unexpected character '{}' at position {}", ch, pos)
            }
            ParseError::UnknownOperator { pos, symbol } => {
                write!(f, "Parse error: unknown operator '{}' at position {}", symbol, pos)
            }
            ParseError::TrailingInput { pos } => write!(f, "Parse error: trailing input at position {}", pos),
        }
    }
}

impl std::error::Error for ParseError {}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        match self.bump() {
            Some(ch) if ch == expected => Ok(()),
            Some(ch) => Err(ParseError::UnexpectedChar {
                pos: self.pos - ch.len_utf8(),
                ch,
            }),
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    fn formula(&mut self) -> Result<Formula, ParseError> {
        let start = self.pos;
        match self.peek() {
            None => Err(ParseError::UnexpectedEnd),
            Some('T') => {
                self.pos += 1;
                Ok(Formula::tt())
            }
            Some('F') => {
                self.pos += 1;
                Ok(Formula::ff())
            }
            Some('~') => {
                self.pos += 1;
                Ok(Formula::not(self.formula()?))
            }
            Some('(') => {
                self.pos += 1;
                let first = self.formula()?;
                let op = self.binary_op()?;
                let second = self.formula()?;
                self.expect(')')?;
                trace!("parsed binary '{}' at {}", op, start);
                Ok(Formula::binary(op, first, second))
            }
            Some('p'..='z') => {
                let len = 1 + self.rest()[1..].bytes().take_while(|b| b.is_ascii_digit()).count();
                let name = &self.rest()[..len];
                self.pos += len;
                Ok(Formula::var(name))
            }
            Some(ch) => Err(ParseError::UnexpectedChar { pos: start, ch }),
        }
    }

    fn binary_op(&mut self) -> Result<BinaryOp, ParseError> {
        let start = self.pos;
        // Longest match first: "<->" before "-&"/"-|"/"->".
        let mut ops = BinaryOp::ALL;
        ops.sort_by_key(|op| std::cmp::Reverse(op.symbol().len()));
        if let Some(op) = ops.into_iter().find(|op| self.rest().starts_with(op.symbol())) {
            self.pos += op.symbol().len();
            return Ok(op);
        }
        match self.peek() {
            None => Err(ParseError::UnexpectedEnd),
            Some(ch) => {
                let symbol: String = self
                    .rest()
                    .chars()
                    .take_while(|c| !c.is_ascii_alphanumeric() && !c.is_whitespace() && !matches!(c, '(' | ')' | '~'))
                    .collect();
                if symbol.is_empty() {
                    Err(ParseError::UnexpectedChar { pos: start, ch })
                } else {
                    Err(ParseError::UnknownOperator { pos: start, symbol })
                }
            }
        }
    }
}

impl Formula {
    /// Parses a formula from its textual representation.
    ///
    /// Leading and trailing whitespace is ignored.
    ///
    /// # Example
    ///
    /// ```
    /// use prop_basis::formula::Formula;
    ///
    /// let f = Formula::parse("(p->~(q-&T))").unwrap();
    /// assert_eq!(f, Formula::implies(Formula::var("p"), Formula::not(Formula::nand(Formula::var("q"), Formula::tt()))));
    /// ```
    pub fn parse(input: &str) -> Result<Formula, ParseError> {
        let trimmed = input.trim();
        let offset = input.len() - input.trim_start().len();
        let mut parser = Parser::new(trimmed);
        let formula = parser.formula().map_err(|e| e.shifted(offset))?;
        if parser.pos != trimmed.len() {
            return Err(ParseError::TrailingInput { pos: parser.pos + offset });
        }
        Ok(formula)
    }
}

impl ParseError {
    fn shifted(self, offset: usize) -> Self {
        match self {
            ParseError::UnexpectedEnd => ParseError::UnexpectedEnd,
            ParseError::UnexpectedChar { pos, ch } => ParseError::UnexpectedChar { pos: pos + offset, ch },
            ParseError::UnknownOperator { pos, symbol } => ParseError::UnknownOperator {
                pos: pos + offset,
                symbol,
            },
            ParseError::TrailingInput { pos } => ParseError::TrailingInput { pos: pos + offset },
        }
    }
}

impl FromStr for Formula {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Formula::parse(s)
    }
}
