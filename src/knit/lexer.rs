//! Lexer module for the knit pattern language
//!
//! This module contains the tokenization logic: token definitions, source
//! positions, and the streaming [`Lexer`] the parser pulls tokens from.
//!
//! Lexing happens in two layers. A plain logos scanner classifies the text of
//! one source (see [`tokens`]); the [`Lexer`] drops whitespace, attaches
//! positions, and concatenates several sources, inserting a `NextSource`
//! marker between them. The parser only ever sees the second layer, through
//! `next()` and a one-token `peek()`.

pub mod lexer_impl;
pub mod position;
pub mod source;
pub mod tokens;

pub use lexer_impl::{tokenize, Lexer};
pub use position::Position;
pub use source::{LexError, Source};
pub use tokens::{Token, TokenKind};
