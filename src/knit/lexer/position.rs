//! Line/column tracking for source text

use serde::{Deserialize, Serialize};
use std::fmt;

/// A location in a source: 1-based line, column of the last consumed character.
///
/// Before anything is consumed a position sits at line 1, column 0, so the
/// first character read lands on column 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Position { line, column }
    }

    /// The position before the first character of a source
    pub fn start() -> Self {
        Position { line: 1, column: 0 }
    }

    /// Move past one character; `\n` and `\r` each end a line
    pub fn advance(&mut self, ch: char) {
        if is_line_break(ch) {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
    }

    /// Undo an [`advance`](Self::advance) over `ch`.
    ///
    /// `previous_column` is the column held before that advance; it is only
    /// needed to step back over a line break.
    pub fn retreat(&mut self, ch: char, previous_column: usize) {
        if is_line_break(ch) {
            self.line = self.line.saturating_sub(1).max(1);
            self.column = previous_column;
        } else {
            self.column = self.column.saturating_sub(1);
        }
    }

    /// Move past a run of text, counting `\r\n` as a single line break
    pub fn advance_over(&mut self, text: &str) {
        let mut chars = text.chars().peekable();
        while let Some(ch) = chars.next() {
            if ch == '\r' && chars.peek() == Some(&'\n') {
                continue;
            }
            self.advance(ch);
        }
    }

    /// Where the next character consumed will sit
    pub fn following(&self) -> Position {
        Position {
            line: self.line,
            column: self.column + 1,
        }
    }
}

fn is_line_break(ch: char) -> bool {
    ch == '\n' || ch == '\r'
}

impl Default for Position {
    fn default() -> Self {
        Position::start()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
