//! Implementation of the knit lexer
//!
//! Token recognition is handled by logos. This module turns its output into
//! positioned [`Token`]s and stitches several sources into one stream.

use crate::knit::lexer::position::Position;
use crate::knit::lexer::source::{LexError, Source};
use crate::knit::lexer::tokens::{RawToken, Token, TokenKind};
use logos::Logos;
use std::collections::VecDeque;
use std::path::Path;
use tracing::{debug, trace};

/// Tokenize a single source, keeping whitespace.
///
/// The literals of the returned tokens concatenate back to `source`.
pub fn tokenize(source: &str) -> Vec<Token> {
    scan(source, 0).0
}

/// Scan one source, returning its tokens and the position after its last character
fn scan(text: &str, source: usize) -> (Vec<Token>, Position) {
    let mut lexer = RawToken::lexer(text);
    let mut position = Position::start();
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let literal = lexer.slice();
        let kind = match result {
            Ok(raw) => TokenKind::from(raw),
            Err(_) => TokenKind::Illegal,
        };
        tokens.push(Token::new(kind, literal, position.following(), source));
        position.advance_over(literal);
    }

    (tokens, position)
}

/// Streaming lexer over one or more sources.
///
/// Whitespace is dropped; everything else is handed out one token at a time.
/// When a source runs out and another follows, a single
/// [`TokenKind::NextSource`] is produced; once the last source runs out every
/// call yields [`TokenKind::Eof`].
#[derive(Debug)]
pub struct Lexer {
    sources: Vec<Source>,
    current: usize,
    pending: VecDeque<Token>,
    end: Position,
    peeked: Option<Token>,
}

impl Lexer {
    pub fn new(sources: Vec<Source>) -> Self {
        let mut lexer = Lexer {
            sources,
            current: 0,
            pending: VecDeque::new(),
            end: Position::start(),
            peeked: None,
        };
        lexer.load(0);
        lexer
    }

    /// A lexer over a single in-memory text
    pub fn from_text(text: &str) -> Self {
        Lexer::new(vec![Source::new("<input>", text)])
    }

    /// Read every path up front; the files are lexed in the given order
    pub fn open<P: AsRef<Path>>(paths: &[P]) -> Result<Self, LexError> {
        if paths.is_empty() {
            return Err(LexError::NoSources);
        }
        let sources = paths
            .iter()
            .map(|path| Source::read(path.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Lexer::new(sources))
    }

    /// Consume and return the next token
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Token {
        match self.peeked.take() {
            Some(token) => token,
            None => self.read(),
        }
    }

    /// Return the next token without consuming it
    pub fn peek(&mut self) -> &Token {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.read(),
        };
        self.peeked.insert(token)
    }

    fn load(&mut self, index: usize) {
        let Some(source) = self.sources.get(index) else {
            return;
        };
        let (tokens, end) = scan(&source.text, index);
        self.pending = tokens
            .into_iter()
            .filter(|token| token.kind != TokenKind::Whitespace)
            .collect();
        self.end = end;
        debug!(source = %source.name, tokens = self.pending.len(), "loaded pattern source");
    }

    fn read(&mut self) -> Token {
        if let Some(token) = self.pending.pop_front() {
            trace!(kind = ?token.kind, literal = %token.literal, at = %token.position, "token");
            return token;
        }

        if self.current + 1 < self.sources.len() {
            let token = Token::new(TokenKind::NextSource, "", self.end, self.current);
            self.current += 1;
            self.load(self.current);
            return token;
        }

        Token::new(TokenKind::Eof, "", self.end, self.current)
    }
}
