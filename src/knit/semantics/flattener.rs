//! Second semantic pass: render the tree into line records

use crate::knit::ast::{Block, Expr, Group, Identifier, Names, Row, Stitch, Stmt};
use crate::knit::lexer::Position;
use crate::knit::semantics::lines::{Line, LineContent};
use crate::knit::semantics::resolver::Resolutions;
use std::mem;
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlattenError {
    #[error("{at}: no assignment found for identifier {name}")]
    UnresolvedIdentifier { name: String, at: Position },
    #[error("{at}: macro {name} expands to itself")]
    RecursiveMacro { name: String, at: Position },
    #[error("{at}: group macro {name} cannot be used inside an inline row")]
    GroupInInlineRow { name: String, at: Position },
}

/// Description and repeat arguments of the row statement being built
struct RowFrame {
    desc: Vec<String>,
    args: Vec<String>,
}

struct Flattener<'t, 'a> {
    tables: &'t Resolutions<'a>,
    lines: Vec<Line>,
    /// How many inline braces enclose the current position.
    nested_depth: usize,
    /// Macros currently being expanded, innermost last.
    expanding: Vec<String>,
}

/// Render a parsed pattern into line records using the resolver's tables
pub fn flatten(block: &Block, tables: &Resolutions) -> Result<Vec<Line>, FlattenError> {
    let mut flattener = Flattener {
        tables,
        lines: Vec::new(),
        nested_depth: 0,
        expanding: Vec::new(),
    };
    flattener.block(block)?;
    debug!(lines = flattener.lines.len(), "flattened pattern");
    Ok(flattener.lines)
}

impl<'t, 'a> Flattener<'t, 'a> {
    fn block(&mut self, block: &Block) -> Result<(), FlattenError> {
        self.lines.push(Line::StartBlock {
            desc: block.desc.lines(),
        });
        for stmt in &block.statements {
            self.stmt(stmt)?;
        }
        self.lines.push(Line::EndBlock);
        Ok(())
    }

    fn stmt(&mut self, stmt: &Stmt) -> Result<(), FlattenError> {
        match stmt {
            Stmt::Alias(_) | Stmt::Assign(_) => Ok(()),
            Stmt::Row(stmt) => {
                let mut line = LineContent::default();
                match self.repeated_macro(&stmt.row) {
                    // The macro's braced row stands for the whole line,
                    // so its count repeats the line
                    Some((ident, assigned)) => {
                        let frame = RowFrame {
                            desc: stmt.desc.lines(),
                            args: assigned.args.texts(self.tables),
                        };
                        self.with_macro(ident, |this| this.row(assigned, &mut line, &frame))?;
                        self.emit_row(&frame, line);
                    }
                    None => {
                        let frame = RowFrame {
                            desc: stmt.desc.lines(),
                            args: stmt.row.args.texts(self.tables),
                        };
                        self.row(&stmt.row, &mut line, &frame)?;
                        self.emit_row(&frame, line);
                    }
                }
                Ok(())
            }
            Stmt::Group(stmt) => self.group(&stmt.group, stmt.desc.lines()),
            Stmt::Block(block) => self.block(block),
        }
    }

    fn group(&mut self, group: &Group, desc: Vec<String>) -> Result<(), FlattenError> {
        self.lines.push(Line::StartGroup {
            desc,
            args: group.args.texts(self.tables),
        });
        for stmt in &group.lines {
            self.stmt(stmt)?;
        }
        self.lines.push(Line::EndGroup);
        Ok(())
    }

    fn emit_row(&mut self, frame: &RowFrame, line: LineContent) {
        if line.is_empty() {
            return;
        }
        trace!(row = %line.pretty_row(), "row line");
        self.lines.push(Line::StartRow {
            desc: frame.desc.clone(),
            args: frame.args.clone(),
        });
        self.lines.push(Line::Content(line));
        self.lines.push(Line::EndRow);
    }

    fn row(&mut self, row: &Row, line: &mut LineContent, frame: &RowFrame) -> Result<(), FlattenError> {
        if self.nested_depth == 0 {
            line.args.extend(row.args.texts(self.tables));
        }
        for element in &row.stitches {
            match element {
                Expr::Row(nested) => self.nested_row(nested, line, frame)?,
                other => self.expr(other, line, frame)?,
            }
        }
        Ok(())
    }

    /// A braced row inside a row: `{`, its fragments, then `}` with its count
    fn nested_row(&mut self, nested: &Row, line: &mut LineContent, frame: &RowFrame) -> Result<(), FlattenError> {
        line.row.push("{".to_string());
        self.nested_depth += 1;
        let result = self.row(nested, line, frame);
        self.nested_depth -= 1;
        result?;
        let size = nested.args.size_text(self.tables);
        if size.is_empty() {
            line.row.push("}".to_string());
        } else {
            line.row.push(format!("}} {}", size));
        }
        Ok(())
    }

    /// A row statement that is nothing but a reference to a macro whose
    /// right-hand side is a repeated braced row
    fn repeated_macro<'r>(&self, row: &'r Row) -> Option<(&'r Identifier, &'a Row)> {
        if !row.args.is_empty() {
            return None;
        }
        let ident = match row.stitches.as_slice() {
            [Expr::Identifier(ident)] => ident,
            [Expr::Stitch(stitch)] if stitch.args.is_empty() => &stitch.stitch,
            _ => return None,
        };
        match self.tables.assignment(&ident.name)? {
            Expr::Row(assigned) if !assigned.args.is_empty() => Some((ident, assigned)),
            _ => None,
        }
    }

    fn expr(&mut self, expr: &Expr, line: &mut LineContent, frame: &RowFrame) -> Result<(), FlattenError> {
        match expr {
            Expr::Stitch(stitch) => self.stitch(stitch, line, frame),
            Expr::Row(row) => self.row(row, line, frame),
            Expr::Group(group) => self.group_in_row(group, line, frame),
            Expr::Identifier(ident) => match self.tables.assignment(&ident.name) {
                Some(assigned) => self.expand(ident, assigned, line, frame),
                None => Err(FlattenError::UnresolvedIdentifier {
                    name: ident.name.clone(),
                    at: ident.at,
                }),
            },
            Expr::Size(_) => Ok(()),
        }
    }

    fn stitch(&mut self, stitch: &Stitch, line: &mut LineContent, frame: &RowFrame) -> Result<(), FlattenError> {
        if let Some(assigned) = self.tables.assignment(&stitch.stitch.name) {
            line.args.extend(stitch.args.texts(self.tables));
            return self.expand(&stitch.stitch, assigned, line, frame);
        }

        let name = self.tables.name(&stitch.stitch);
        let size = stitch.args.size_text(self.tables);
        if size.is_empty() {
            line.row.push(name.to_string());
        } else {
            line.row.push(format!("{} {}", name, size));
        }
        Ok(())
    }

    /// Flatten a macro's right-hand side in place
    fn expand(
        &mut self,
        ident: &Identifier,
        assigned: &'a Expr,
        line: &mut LineContent,
        frame: &RowFrame,
    ) -> Result<(), FlattenError> {
        self.with_macro(ident, |this| match assigned {
            // Used among other stitches, a repeated braced row keeps its braces
            Expr::Row(row) if !row.args.is_empty() => this.nested_row(row, line, frame),
            other => this.expr(other, line, frame),
        })
    }

    /// Run `f` with `ident` marked as being expanded
    fn with_macro<F>(&mut self, ident: &Identifier, f: F) -> Result<(), FlattenError>
    where
        F: FnOnce(&mut Self) -> Result<(), FlattenError>,
    {
        if self.expanding.iter().any(|name| *name == ident.name) {
            return Err(FlattenError::RecursiveMacro {
                name: ident.name.clone(),
                at: ident.at,
            });
        }
        trace!(name = %ident.name, "expanding macro");
        self.expanding.push(ident.name.clone());
        let result = f(self);
        self.expanding.pop();
        result
    }

    /// A group macro used as a stitch: close the row built so far, emit the
    /// group, and continue the row on a fresh line.
    fn group_in_row(&mut self, group: &Group, line: &mut LineContent, frame: &RowFrame) -> Result<(), FlattenError> {
        if self.nested_depth > 0 {
            return Err(FlattenError::GroupInInlineRow {
                name: self.expanding.last().cloned().unwrap_or_default(),
                at: group.lbrace,
            });
        }
        let before = mem::take(line);
        self.emit_row(frame, before);
        self.group(group, Vec::new())
    }
}
