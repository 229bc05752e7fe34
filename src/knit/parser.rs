//! Recursive-descent parser for the knit pattern language
//!
//! The grammar is line oriented:
//!
//! ```text
//! ; description lines attach to the next statement
//! yo := yarn-over            alias
//! rib = k p                  macro (a row, or a `{` + newline group)
//! k(2) p(2) {k yo}(3) rib  row; braces nest a sub-row on the same line
//! row k p                    `row` only introduces the row
//! {k p}(4)                   a line holding one braced row is that row
//! {                          group: lines up to the matching brace
//!   row k
//! }(3)
//! ```
//!
//! Bracket lists hold identifiers and sizes (`3`, `12mm`, `2.5"`, `1'`, `*`,
//! `-*`, `-4cm`). Parsing stops at the first error; no partial tree is kept.

mod brackets;
pub mod error;
mod lines;

#[cfg(test)]
mod tests;

pub use error::{ParseError, ParserResult};

use crate::knit::ast::{Block, Identifier};
use crate::knit::lexer::{Lexer, Token, TokenKind};
use tracing::debug;

/// Parse a single in-memory pattern
pub fn parse_str(text: &str) -> ParserResult<Block> {
    Parser::new(Lexer::from_text(text)).parse()
}

pub struct Parser {
    lexer: Lexer,
}

impl Parser {
    pub fn new(lexer: Lexer) -> Self {
        Parser { lexer }
    }

    /// Consume the whole token stream and build the root block
    pub fn parse(mut self) -> ParserResult<Block> {
        let mut root = Block {
            start: self.lexer.peek().position,
            ..Block::default()
        };

        let mut pending = Default::default();
        if self.peek_kind() == TokenKind::Comment {
            let (desc, ended_by_blank) = self.parse_description();
            if ended_by_blank {
                root.desc = desc;
            } else {
                pending = desc;
            }
        }

        root.statements = self.parse_lines(None, pending)?;
        root.end = self.lexer.peek().position;
        debug!(statements = root.statements.len(), "parsed pattern");
        Ok(root)
    }

    fn next(&mut self) -> Token {
        self.lexer.next()
    }

    fn peek_kind(&mut self) -> TokenKind {
        self.lexer.peek().kind
    }

    fn identifier(token: Token) -> Identifier {
        Identifier::new(token.literal, token.position)
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> ParserResult<Token> {
        let token = self.next();
        if token.is(kind) {
            Ok(token)
        } else {
            Err(ParseError::unexpected(&token, expected))
        }
    }
}
