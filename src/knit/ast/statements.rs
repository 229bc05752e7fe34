//! Statement nodes

use crate::knit::ast::expressions::{CommentGroup, Expr, Group, Identifier, Row};
use crate::knit::lexer::Position;
use serde::{Deserialize, Serialize};

/// `lhs := rhs`: render `lhs` as `rhs`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliasStmt {
    pub lhs: Identifier,
    pub rhs: Identifier,
    pub desc: CommentGroup,
}

/// `lhs = ...`: a macro expanded wherever `lhs` is used as a stitch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignStmt {
    pub lhs: Identifier,
    pub rhs: Expr,
    pub desc: CommentGroup,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowStmt {
    pub row: Row,
    pub desc: CommentGroup,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStmt {
    pub group: Group,
    pub desc: CommentGroup,
}

/// A sequence of statements; the root of every parsed pattern
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub start: Position,
    pub end: Position,
    pub desc: CommentGroup,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Stmt {
    #[serde(rename = "AliasStmt")]
    Alias(AliasStmt),
    #[serde(rename = "AssignStmt")]
    Assign(AssignStmt),
    #[serde(rename = "RowStmt")]
    Row(RowStmt),
    #[serde(rename = "GroupStmt")]
    Group(GroupStmt),
    #[serde(rename = "BlockStmt")]
    Block(Block),
}

impl Stmt {
    pub fn desc_mut(&mut self) -> &mut CommentGroup {
        match self {
            Stmt::Alias(stmt) => &mut stmt.desc,
            Stmt::Assign(stmt) => &mut stmt.desc,
            Stmt::Row(stmt) => &mut stmt.desc,
            Stmt::Group(stmt) => &mut stmt.desc,
            Stmt::Block(block) => &mut block.desc,
        }
    }
}
