//! First semantic pass: collect aliases and macro assignments

use crate::knit::ast::{Block, Expr, Identifier, Names, Stmt};
use std::collections::HashMap;
use tracing::trace;

/// Substitution tables for one compilation, borrowing from the tree
#[derive(Debug, Default)]
pub struct Resolutions<'a> {
    aliases: HashMap<&'a str, &'a Identifier>,
    assignments: HashMap<&'a str, &'a Expr>,
}

impl<'a> Resolutions<'a> {
    /// Target of an alias. Aliases of aliases are not followed.
    pub fn alias(&self, name: &str) -> Option<&'a Identifier> {
        self.aliases.get(name).copied()
    }

    /// Right-hand side of a macro assignment
    pub fn assignment(&self, name: &str) -> Option<&'a Expr> {
        self.assignments.get(name).copied()
    }

    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }

    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }

    fn walk_stmt(&mut self, stmt: &'a Stmt) {
        match stmt {
            Stmt::Alias(alias) => {
                trace!(name = %alias.lhs.name, target = %alias.rhs.name, "alias");
                self.aliases.insert(&alias.lhs.name, &alias.rhs);
            }
            Stmt::Assign(assign) => {
                trace!(name = %assign.lhs.name, "assignment");
                self.assignments.insert(&assign.lhs.name, &assign.rhs);
                self.walk_expr(&assign.rhs);
            }
            Stmt::Row(stmt) => {
                for stitch in &stmt.row.stitches {
                    self.walk_expr(stitch);
                }
            }
            Stmt::Group(stmt) => {
                for line in &stmt.group.lines {
                    self.walk_stmt(line);
                }
            }
            Stmt::Block(block) => {
                for stmt in &block.statements {
                    self.walk_stmt(stmt);
                }
            }
        }
    }

    fn walk_expr(&mut self, expr: &'a Expr) {
        match expr {
            Expr::Row(row) => {
                for stitch in &row.stitches {
                    self.walk_expr(stitch);
                }
            }
            Expr::Group(group) => {
                for line in &group.lines {
                    self.walk_stmt(line);
                }
            }
            Expr::Identifier(_) | Expr::Size(_) | Expr::Stitch(_) => {}
        }
    }
}

impl Names for Resolutions<'_> {
    fn name<'b>(&'b self, ident: &'b Identifier) -> &'b str {
        match self.aliases.get(ident.name.as_str()) {
            Some(target) => &target.name,
            None => &ident.name,
        }
    }
}

/// Walk the tree once and build the alias and assignment tables.
///
/// Later definitions of a name replace earlier ones.
pub fn resolve(block: &Block) -> Resolutions<'_> {
    let mut tables = Resolutions::default();
    for stmt in &block.statements {
        tables.walk_stmt(stmt);
    }
    tables
}
