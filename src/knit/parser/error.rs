//! Syntax errors

use crate::knit::lexer::{Position, Token, TokenKind};
use thiserror::Error;

pub type ParserResult<T> = Result<T, ParseError>;

/// The first ungrammatical construct found in a pattern
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("{at}: expected {expected}, found {found} {literal:?}")]
    Unexpected {
        found: TokenKind,
        literal: String,
        at: Position,
        expected: &'static str,
    },
    #[error("{at}: inline row opened at {open} must close on the same line")]
    UnclosedRow { at: Position, open: Position },
    #[error("{at}: group opened at {open} is never closed")]
    UnclosedGroup { at: Position, open: Position },
    #[error("{at}: {literal:?} is not a number")]
    InvalidNumber { literal: String, at: Position },
    #[error("{at}: unknown unit {literal:?}, expected mm, cm, \" or '")]
    UnknownUnit { literal: String, at: Position },
}

impl ParseError {
    pub fn unexpected(token: &Token, expected: &'static str) -> Self {
        ParseError::Unexpected {
            found: token.kind,
            literal: token.literal.clone(),
            at: token.position,
            expected,
        }
    }
}
