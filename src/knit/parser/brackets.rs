//! Bracket lists and sizes

use super::{ParseError, Parser, ParserResult};
use crate::knit::ast::{Brackets, Expr, Size, SizeValue, Unit};
use crate::knit::lexer::{Token, TokenKind};

impl Parser {
    /// Parse a comma-separated argument list up to the closing `)`; the `(`
    /// has been consumed
    pub(super) fn parse_brackets(&mut self) -> ParserResult<Brackets> {
        let mut args = Vec::new();
        if self.peek_kind() == TokenKind::RightParen {
            self.next();
            return Ok(Brackets::new(args));
        }
        loop {
            args.push(self.parse_argument()?);
            let token = self.next();
            match token.kind {
                TokenKind::Comma => {}
                TokenKind::RightParen => return Ok(Brackets::new(args)),
                _ => return Err(ParseError::unexpected(&token, "',' or ')'")),
            }
        }
    }

    fn parse_argument(&mut self) -> ParserResult<Expr> {
        let token = self.next();
        match token.kind {
            // `n` alone names a value, `n cm` is a size measured in it
            TokenKind::Identifier => match self.peek_kind() {
                TokenKind::Identifier | TokenKind::Feet | TokenKind::Inches => {
                    Ok(Expr::Size(self.parse_size(token)?))
                }
                _ => Ok(Expr::Identifier(Self::identifier(token))),
            },
            TokenKind::Numeric | TokenKind::Asterisk => Ok(Expr::Size(self.parse_size(token)?)),
            TokenKind::Minus => {
                let value = self.next();
                if !value.kind.is_size_value() {
                    return Err(ParseError::unexpected(&value, "a size after '-'"));
                }
                let mut size = self.parse_size(value)?;
                size.before = true;
                Ok(Expr::Size(size))
            }
            _ => Err(ParseError::unexpected(&token, "an argument")),
        }
    }

    fn parse_size(&mut self, token: Token) -> ParserResult<Size> {
        let at = token.position;
        match token.kind {
            TokenKind::Asterisk => Ok(Size::asterisk(at)),
            TokenKind::Identifier => {
                let value = SizeValue::Ident(Self::identifier(token));
                Ok(Size::new(at, value, self.parse_unit()?))
            }
            _ => {
                let value = parse_number(&token)?;
                Ok(Size::new(at, value, self.parse_unit()?))
            }
        }
    }

    /// The optional unit after a size value
    fn parse_unit(&mut self) -> ParserResult<Unit> {
        match self.peek_kind() {
            TokenKind::Comma | TokenKind::RightParen => Ok(Unit::None),
            TokenKind::Feet => {
                self.next();
                Ok(Unit::Feet)
            }
            TokenKind::Inches => {
                self.next();
                Ok(Unit::Inches)
            }
            TokenKind::Identifier => {
                let token = self.next();
                Unit::from_suffix(&token.literal).ok_or(ParseError::UnknownUnit {
                    literal: token.literal,
                    at: token.position,
                })
            }
            _ => {
                let token = self.next();
                Err(ParseError::unexpected(&token, "a unit, ',' or ')'"))
            }
        }
    }
}

/// Integers stay exact; anything else numeric becomes a float
fn parse_number(token: &Token) -> ParserResult<SizeValue> {
    if let Ok(n) = token.literal.parse::<i64>() {
        return Ok(SizeValue::Int(n));
    }
    if let Ok(n) = token.literal.parse::<f64>() {
        return Ok(SizeValue::Float(n));
    }
    Err(ParseError::InvalidNumber {
        literal: token.literal.clone(),
        at: token.position,
    })
}
