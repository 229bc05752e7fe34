//! Line records: the flattened, linear form of a pattern

use serde::{Deserialize, Serialize};

/// The rendered content of one row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineContent {
    pub desc: Vec<String>,
    pub args: Vec<String>,
    pub row: Vec<String>,
}

impl LineContent {
    pub fn is_empty(&self) -> bool {
        self.desc.is_empty() && self.args.is_empty() && self.row.is_empty()
    }

    pub fn pretty_row(&self) -> String {
        pretty_row(&self.row)
    }
}

/// One record of flattening output.
///
/// Start sentinels carry the construct's description lines and the
/// rendered text of its bracket arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Line {
    StartBlock { desc: Vec<String> },
    EndBlock,
    StartGroup { desc: Vec<String>, args: Vec<String> },
    EndGroup,
    StartRow { desc: Vec<String>, args: Vec<String> },
    EndRow,
    Content(LineContent),
}

/// Join row fragments with commas, none inside brace edges: `k, { p, yo } 2, k`
pub fn pretty_row(row: &[String]) -> String {
    let mut parts = Vec::with_capacity(row.len());
    for (idx, fragment) in row.iter().enumerate() {
        let last = idx + 1 == row.len();
        let before_close = row.get(idx + 1).is_some_and(|next| next.starts_with('}'));
        if fragment == "{" || before_close || last {
            parts.push(fragment.clone());
        } else {
            parts.push(format!("{},", fragment));
        }
    }
    parts.join(" ")
}

/// Human-readable listing of line records
pub fn render_lines(lines: &[Line]) -> String {
    let mut out = String::new();
    for line in lines {
        match line {
            Line::StartBlock { desc } => {
                out.push_str("START: BLOCK\n");
                push_desc(&mut out, desc);
            }
            Line::EndBlock => out.push_str("END: BLOCK\n"),
            Line::StartGroup { desc, args } => {
                push_start(&mut out, "GROUP", args);
                push_desc(&mut out, desc);
            }
            Line::EndGroup => out.push_str("END: GROUP\n"),
            Line::StartRow { desc, args } => {
                push_start(&mut out, "ROW", args);
                push_desc(&mut out, desc);
            }
            Line::EndRow => out.push_str("END: ROW\n"),
            Line::Content(content) => {
                if !content.row.is_empty() {
                    out.push_str(&format!("row: {}\n", content.pretty_row()));
                }
                if !content.args.is_empty() {
                    out.push_str(&format!(" args: {}\n", content.args.join(", ")));
                }
            }
        }
    }
    out
}

fn push_start(out: &mut String, what: &str, args: &[String]) {
    if args.is_empty() {
        out.push_str(&format!("START: {}\n", what));
    } else {
        out.push_str(&format!("START: {} ({})\n", what, args.join(", ")));
    }
}

fn push_desc(out: &mut String, desc: &[String]) {
    for line in desc.iter().filter(|line| !line.is_empty()) {
        out.push_str(&format!("  ; {}\n", line));
    }
}
