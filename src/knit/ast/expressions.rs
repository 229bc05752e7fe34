//! Expression nodes: identifiers, descriptions, bracket lists, stitches, rows and groups

use crate::knit::ast::size::Size;
use crate::knit::ast::statements::Stmt;
use crate::knit::lexer::Position;
use serde::{Deserialize, Serialize};

/// Decides the name an identifier is rendered with
pub trait Names {
    fn name<'a>(&'a self, ident: &'a Identifier) -> &'a str;
}

/// Renders every identifier exactly as written
pub struct Verbatim;

impl Names for Verbatim {
    fn name<'a>(&'a self, ident: &'a Identifier) -> &'a str {
        &ident.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    pub at: Position,
    pub name: String,
}

impl Identifier {
    pub fn new(name: impl Into<String>, at: Position) -> Self {
        Identifier {
            at,
            name: name.into(),
        }
    }
}

/// One `;` comment line, kept verbatim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub at: Position,
    pub text: String,
}

/// The description attached to a statement
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentGroup {
    pub comments: Vec<Comment>,
}

impl CommentGroup {
    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    pub fn push(&mut self, comment: Comment) {
        self.comments.push(comment);
    }

    /// Append another group, separated from this one by a blank line
    pub fn extend_paragraph(&mut self, other: CommentGroup) {
        if other.is_empty() {
            return;
        }
        if !self.is_empty() {
            let at = other.comments[0].at;
            self.comments.push(Comment {
                at,
                text: String::new(),
            });
        }
        self.comments.extend(other.comments);
    }

    /// Normalized description lines.
    ///
    /// Each comment loses one leading `;` and surrounding whitespace. Leading
    /// blank lines are dropped, blank runs collapse to one, and a non-empty
    /// description always ends in exactly one blank line.
    pub fn lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = Vec::with_capacity(self.comments.len() + 1);
        for comment in &self.comments {
            let text = comment.text.strip_prefix(';').unwrap_or(&comment.text);
            let line = text.trim_matches(|c| c == '\n' || c == '\t' || c == ' ');
            let previous_blank = lines.last().map_or(true, |last| last.is_empty());
            if !line.is_empty() || !previous_blank {
                lines.push(line.to_string());
            }
        }
        if lines.last().is_some_and(|last| !last.is_empty()) {
            lines.push(String::new());
        }
        lines
    }
}

/// An argument list: `(3)`, `(2, 5cm)`, `(-*)`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Brackets {
    pub args: Vec<Expr>,
}

impl Brackets {
    pub fn new(args: Vec<Expr>) -> Self {
        Brackets { args }
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Rendered text of each argument
    pub fn texts(&self, names: &impl Names) -> Vec<String> {
        self.args.iter().map(|arg| arg.text(names)).collect()
    }

    /// All arguments rendered as one phrase, joined by spaces
    pub fn size_text(&self, names: &impl Names) -> String {
        match self.args.as_slice() {
            [single] => single.text(names),
            args => args
                .iter()
                .map(|arg| arg.text(names))
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

/// `k`, `p(3)`, `cast-on(-*)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stitch {
    pub at: Position,
    pub stitch: Identifier,
    pub args: Brackets,
}

impl Stitch {
    pub fn new(stitch: Identifier, args: Brackets) -> Self {
        Stitch {
            at: stitch.at,
            stitch,
            args,
        }
    }
}

/// A row of stitches; braced sub-rows appear as nested [`Expr::Row`]s
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub stitches: Vec<Expr>,
    pub args: Brackets,
}

impl Row {
    pub fn new(stitches: Vec<Expr>, args: Brackets) -> Self {
        Row { stitches, args }
    }

    pub fn position(&self) -> Option<Position> {
        self.stitches.first().map(Expr::position)
    }
}

/// Lines between braces on their own lines, repeated as a whole
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub lbrace: Position,
    pub rbrace: Position,
    pub args: Brackets,
    pub lines: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Expr {
    #[serde(rename = "IdentExpr")]
    Identifier(Identifier),
    #[serde(rename = "SizeExpr")]
    Size(Size),
    #[serde(rename = "StitchExpr")]
    Stitch(Stitch),
    #[serde(rename = "RowExpr")]
    Row(Row),
    #[serde(rename = "GroupExpr")]
    Group(Group),
}

impl Expr {
    pub fn position(&self) -> Position {
        match self {
            Expr::Identifier(ident) => ident.at,
            Expr::Size(size) => size.at,
            Expr::Stitch(stitch) => stitch.at,
            Expr::Row(row) => row.position().unwrap_or_default(),
            Expr::Group(group) => group.lbrace,
        }
    }

    /// Text used where the expression appears as an argument
    pub fn text(&self, names: &impl Names) -> String {
        match self {
            Expr::Identifier(ident) => names.name(ident).to_string(),
            Expr::Size(size) => size.text(names),
            Expr::Stitch(_) | Expr::Row(_) | Expr::Group(_) => String::new(),
        }
    }
}
