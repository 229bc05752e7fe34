//! Token definitions for the knit pattern language
//!
//! Recognition is done by a logos scanner ([`RawToken`]). Logos needs an enum
//! whose every variant it can produce, while the parser also needs kinds that
//! never come from the input text itself (end of a source, end of input, an
//! unrecognized character), so the public [`TokenKind`] is a separate enum that
//! the raw scanner output is mapped into.

use crate::knit::lexer::position::Position;
use logos::Logos;
use serde::Serialize;
use std::fmt;

/// Token classes recognized directly from source text.
///
/// Every byte of the input lands in exactly one raw token (or in an error
/// span, which becomes [`TokenKind::Illegal`]), so concatenating the token
/// slices reconstructs the source.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RawToken {
    /// Spaces and tabs. Line breaks are not whitespace.
    #[regex(r"[ \t\f]+")]
    Whitespace,

    /// `\r\n`, `\r` or `\n`
    #[regex(r"\r\n|\r|\n")]
    Newline,

    /// `;` up to, but excluding, the line terminator.
    #[regex(r";[^\r\n]*")]
    Comment,

    /// A letter followed by letters and hyphens: `k`, `p`, `k-tbl`.
    #[regex(r"[A-Za-z][A-Za-z-]*")]
    Identifier,

    /// Digits and dots: `12`, `1.5`. Validated by the parser.
    #[regex(r"[0-9.]+")]
    Numeric,

    #[token("-")]
    Minus,
    #[token("*")]
    Asterisk,
    #[token("'")]
    Feet,
    #[token("\"")]
    Inches,
    #[token(",")]
    Comma,
    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token("{")]
    LeftBrace,
    #[token("}")]
    RightBrace,
    #[token("=")]
    Equals,
    #[token(":=")]
    Alias,
}

/// The kind of a token handed to the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    /// All sources are exhausted. Repeats forever once reached.
    Eof,
    /// The current source is exhausted and another one follows.
    NextSource,
    Whitespace,
    Newline,
    Comment,
    Identifier,
    Numeric,
    Minus,
    Asterisk,
    Feet,
    Inches,
    Comma,
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Equals,
    Alias,
    /// A character no token class accepts.
    Illegal,
}

impl From<RawToken> for TokenKind {
    fn from(raw: RawToken) -> Self {
        match raw {
            RawToken::Whitespace => TokenKind::Whitespace,
            RawToken::Newline => TokenKind::Newline,
            RawToken::Comment => TokenKind::Comment,
            RawToken::Identifier => TokenKind::Identifier,
            RawToken::Numeric => TokenKind::Numeric,
            RawToken::Minus => TokenKind::Minus,
            RawToken::Asterisk => TokenKind::Asterisk,
            RawToken::Feet => TokenKind::Feet,
            RawToken::Inches => TokenKind::Inches,
            RawToken::Comma => TokenKind::Comma,
            RawToken::LeftParen => TokenKind::LeftParen,
            RawToken::RightParen => TokenKind::RightParen,
            RawToken::LeftBrace => TokenKind::LeftBrace,
            RawToken::RightBrace => TokenKind::RightBrace,
            RawToken::Equals => TokenKind::Equals,
            RawToken::Alias => TokenKind::Alias,
        }
    }
}

impl TokenKind {
    /// Check if this token terminates a logical line
    pub fn ends_line(&self) -> bool {
        matches!(
            self,
            TokenKind::Newline | TokenKind::NextSource | TokenKind::Eof
        )
    }

    /// Check if this token ends the token stream of a source
    pub fn ends_source(&self) -> bool {
        matches!(self, TokenKind::NextSource | TokenKind::Eof)
    }

    /// Check if this token may start a size inside a bracket list
    pub fn is_size_value(&self) -> bool {
        matches!(
            self,
            TokenKind::Numeric | TokenKind::Identifier | TokenKind::Asterisk
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Eof => "end of input",
            TokenKind::NextSource => "end of source",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Newline => "newline",
            TokenKind::Comment => "comment",
            TokenKind::Identifier => "identifier",
            TokenKind::Numeric => "number",
            TokenKind::Minus => "'-'",
            TokenKind::Asterisk => "'*'",
            TokenKind::Feet => "feet mark",
            TokenKind::Inches => "inches mark",
            TokenKind::Comma => "','",
            TokenKind::LeftParen => "'('",
            TokenKind::RightParen => "')'",
            TokenKind::LeftBrace => "'{'",
            TokenKind::RightBrace => "'}'",
            TokenKind::Equals => "'='",
            TokenKind::Alias => "':='",
            TokenKind::Illegal => "illegal character",
        };
        f.write_str(name)
    }
}

/// A positioned token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    /// The exact source text of the token. Empty for `Eof` and `NextSource`.
    pub literal: String,
    /// Where the token's first character sits.
    pub position: Position,
    /// Index of the source the token came from.
    pub source: usize,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>, position: Position, source: usize) -> Self {
        Token {
            kind,
            literal: literal.into(),
            position,
            source,
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}
