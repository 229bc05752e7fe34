//! AST for the knit pattern language
//!
//! Expressions ([`Expr`]) and statements ([`Stmt`]) are closed sum types. A
//! parse always produces one root [`Block`]. The tree is never mutated after
//! parsing; the semantic passes only read it.

pub mod expressions;
pub mod json;
pub mod size;
pub mod statements;

pub use expressions::{
    Brackets, Comment, CommentGroup, Expr, Group, Identifier, Names, Row, Stitch, Verbatim,
};
pub use json::{from_json, read_json, to_json, to_yaml, write_json, SerializationError};
pub use size::{Size, SizeValue, Unit};
pub use statements::{AliasStmt, AssignStmt, Block, GroupStmt, RowStmt, Stmt};
