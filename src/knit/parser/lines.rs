//! Statement and line grammar

use super::{ParseError, Parser, ParserResult};
use crate::knit::ast::{
    AliasStmt, AssignStmt, Brackets, Comment, CommentGroup, Expr, Group, GroupStmt, Row, RowStmt,
    Stitch, Stmt,
};
use crate::knit::lexer::{Position, Token, TokenKind};
use std::mem;
use tracing::{debug, trace};

/// Keyword that may introduce a row without being a stitch itself
const ROW_KEYWORD: &str = "row";

impl Parser {
    /// Parse statements up to the end of input, or up to the `}` closing the
    /// group opened at `open` (left unconsumed).
    pub(super) fn parse_lines(
        &mut self,
        open: Option<Position>,
        mut pending: CommentGroup,
    ) -> ParserResult<Vec<Stmt>> {
        let mut statements = Vec::new();
        loop {
            match self.peek_kind() {
                TokenKind::Newline => {
                    self.next();
                }
                TokenKind::NextSource if open.is_none() => {
                    self.next();
                }
                TokenKind::NextSource | TokenKind::Eof => {
                    let token = self.next();
                    if let Some(open) = open {
                        return Err(ParseError::UnclosedGroup {
                            at: token.position,
                            open,
                        });
                    }
                    break;
                }
                TokenKind::Comment => {
                    let (desc, _) = self.parse_description();
                    pending.extend_paragraph(desc);
                }
                TokenKind::RightBrace if open.is_some() => break,
                _ => {
                    let desc = mem::take(&mut pending);
                    statements.push(self.parse_line(desc)?);
                }
            }
        }
        if !pending.is_empty() {
            debug!(lines = pending.comments.len(), "description not followed by a statement");
        }
        Ok(statements)
    }

    /// Collect consecutive comment lines.
    ///
    /// Also reports whether a blank line ended the run.
    pub(super) fn parse_description(&mut self) -> (CommentGroup, bool) {
        let mut desc = CommentGroup::default();
        while self.peek_kind() == TokenKind::Comment {
            let token = self.next();
            desc.push(Comment {
                at: token.position,
                text: token.literal,
            });
            if self.peek_kind() != TokenKind::Newline {
                break;
            }
            self.next();
            if self.peek_kind() == TokenKind::Newline {
                return (desc, true);
            }
        }
        (desc, false)
    }

    fn parse_line(&mut self, desc: CommentGroup) -> ParserResult<Stmt> {
        let token = self.next();
        trace!(kind = ?token.kind, at = %token.position, "line");
        let mut stmt = match token.kind {
            TokenKind::Identifier => self.parse_identifier_line(desc, token)?,
            TokenKind::LeftBrace => self.parse_brace_line(desc, token)?,
            _ => return Err(ParseError::unexpected(&token, "a statement")),
        };
        if let Some(comment) = self.end_of_line()? {
            stmt.desc_mut().push(comment);
        }
        Ok(stmt)
    }

    /// Accept an optional trailing comment and the end of the line
    fn end_of_line(&mut self) -> ParserResult<Option<Comment>> {
        let comment = if self.peek_kind() == TokenKind::Comment {
            let token = self.next();
            Some(Comment {
                at: token.position,
                text: token.literal,
            })
        } else {
            None
        };
        match self.peek_kind() {
            TokenKind::Newline => {
                self.next();
                Ok(comment)
            }
            kind if kind.ends_source() => Ok(comment),
            _ => {
                let token = self.next();
                Err(ParseError::unexpected(&token, "end of line"))
            }
        }
    }

    fn parse_identifier_line(&mut self, desc: CommentGroup, first: Token) -> ParserResult<Stmt> {
        match self.peek_kind() {
            TokenKind::Alias => {
                self.next();
                let rhs = self.expect(TokenKind::Identifier, "an alias target")?;
                Ok(Stmt::Alias(AliasStmt {
                    lhs: Self::identifier(first),
                    rhs: Self::identifier(rhs),
                    desc,
                }))
            }
            TokenKind::Equals => {
                self.next();
                let rhs = self.parse_stitches()?;
                Ok(Stmt::Assign(AssignStmt {
                    lhs: Self::identifier(first),
                    rhs,
                    desc,
                }))
            }
            TokenKind::Identifier | TokenKind::LeftBrace if first.literal == ROW_KEYWORD => {
                let row = self.parse_row_line(None)?;
                Ok(Stmt::Row(RowStmt { row, desc }))
            }
            TokenKind::LeftParen
            | TokenKind::LeftBrace
            | TokenKind::Identifier
            | TokenKind::Comment => self.parse_stitch_row(desc, first),
            kind if kind.ends_line() => self.parse_stitch_row(desc, first),
            _ => {
                let token = self.next();
                Err(ParseError::unexpected(
                    &token,
                    "':=', '=', a stitch or end of line",
                ))
            }
        }
    }

    /// A row line that starts with the stitch `first`
    fn parse_stitch_row(&mut self, desc: CommentGroup, first: Token) -> ParserResult<Stmt> {
        let stitch = self.parse_stitch(first)?;
        let row = self.parse_row_line(Some(Expr::Stitch(stitch)))?;
        Ok(Stmt::Row(RowStmt { row, desc }))
    }

    fn parse_brace_line(&mut self, desc: CommentGroup, lbrace: Token) -> ParserResult<Stmt> {
        match self.peek_kind() {
            TokenKind::Newline => {
                let group = self.parse_group(lbrace.position)?;
                Ok(Stmt::Group(GroupStmt { group, desc }))
            }
            TokenKind::Identifier | TokenKind::LeftBrace => {
                let nested = self.parse_braced_row(lbrace.position)?;
                let row = self.parse_row_line(Some(Expr::Row(nested)))?;
                Ok(Stmt::Row(RowStmt { row, desc }))
            }
            _ => {
                let token = self.next();
                Err(ParseError::unexpected(&token, "a newline or a stitch after '{'"))
            }
        }
    }

    /// Right-hand side of an assignment
    fn parse_stitches(&mut self) -> ParserResult<Expr> {
        let token = self.next();
        match token.kind {
            TokenKind::LeftBrace => match self.peek_kind() {
                TokenKind::Newline => Ok(Expr::Group(self.parse_group(token.position)?)),
                TokenKind::Identifier | TokenKind::LeftBrace => {
                    let nested = self.parse_braced_row(token.position)?;
                    Ok(Expr::Row(self.parse_row_line(Some(Expr::Row(nested)))?))
                }
                _ => {
                    let token = self.next();
                    Err(ParseError::unexpected(&token, "a newline or a stitch after '{'"))
                }
            },
            TokenKind::Identifier => {
                let stitch = self.parse_stitch(token)?;
                Ok(Expr::Row(self.parse_row_line(Some(Expr::Stitch(stitch)))?))
            }
            _ => Err(ParseError::unexpected(&token, "a row or a group")),
        }
    }

    /// Parse a group body; the `{` has been consumed and a newline follows
    fn parse_group(&mut self, lbrace: Position) -> ParserResult<Group> {
        let lines = self.parse_lines(Some(lbrace), CommentGroup::default())?;
        let rbrace = self.expect(TokenKind::RightBrace, "'}'")?;
        let args = if self.peek_kind() == TokenKind::LeftParen {
            self.next();
            self.parse_brackets()?
        } else {
            Brackets::default()
        };
        Ok(Group {
            lbrace,
            rbrace: rbrace.position,
            args,
            lines,
        })
    }

    /// Parse the rest of a row line after its already parsed `first` element.
    ///
    /// A line made of exactly one braced row is that row, so its bracket
    /// list becomes the row's repeat count.
    fn parse_row_line(&mut self, first: Option<Expr>) -> ParserResult<Row> {
        let mut stitches: Vec<Expr> = first.into_iter().collect();
        loop {
            match self.peek_kind() {
                TokenKind::Identifier => {
                    let token = self.next();
                    stitches.push(Expr::Stitch(self.parse_stitch(token)?));
                }
                TokenKind::LeftBrace => {
                    let token = self.next();
                    stitches.push(Expr::Row(self.parse_braced_row(token.position)?));
                }
                kind if kind.ends_line() || kind == TokenKind::Comment => break,
                _ => {
                    let token = self.next();
                    return Err(ParseError::unexpected(&token, "a stitch or end of line"));
                }
            }
        }

        if matches!(stitches.as_slice(), [Expr::Row(_)]) {
            if let Some(Expr::Row(row)) = stitches.pop() {
                return Ok(row);
            }
        }
        Ok(Row::new(stitches, Brackets::default()))
    }

    /// Parse a same-line braced row; the `{` at `open` has been consumed
    fn parse_braced_row(&mut self, open: Position) -> ParserResult<Row> {
        let mut stitches = Vec::new();
        loop {
            let token = self.next();
            match token.kind {
                TokenKind::Identifier => stitches.push(Expr::Stitch(self.parse_stitch(token)?)),
                TokenKind::LeftBrace => {
                    stitches.push(Expr::Row(self.parse_braced_row(token.position)?))
                }
                TokenKind::RightBrace => {
                    let args = if self.peek_kind() == TokenKind::LeftParen {
                        self.next();
                        self.parse_brackets()?
                    } else {
                        Brackets::default()
                    };
                    return Ok(Row::new(stitches, args));
                }
                kind if kind.ends_line() || kind == TokenKind::Comment => {
                    return Err(ParseError::UnclosedRow {
                        at: token.position,
                        open,
                    })
                }
                _ => return Err(ParseError::unexpected(&token, "a stitch or '}'")),
            }
        }
    }

    /// A stitch name and its optional bracket list
    fn parse_stitch(&mut self, name: Token) -> ParserResult<Stitch> {
        let args = match self.peek_kind() {
            TokenKind::LeftParen => {
                self.next();
                self.parse_brackets()?
            }
            TokenKind::Identifier
            | TokenKind::LeftBrace
            | TokenKind::RightBrace
            | TokenKind::Comment => Brackets::default(),
            kind if kind.ends_line() => Brackets::default(),
            _ => {
                let token = self.next();
                return Err(ParseError::unexpected(&token, "a stitch, '(' or end of line"));
            }
        };
        Ok(Stitch::new(Self::identifier(name), args))
    }
}
