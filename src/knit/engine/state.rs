//! One navigable step of an expanded pattern

use crate::knit::semantics::pretty_row;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The most specific descriptions in effect when a state was emitted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptions {
    pub block: String,
    pub group: String,
    pub row: String,
}

/// Position within a repeated group or row: iteration `current` of `max`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repeat {
    pub current: usize,
    pub max: usize,
}

impl fmt::Display for Repeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.current, self.max)
    }
}

/// Interactive counters kept by the viewer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    pub stitch: usize,
    pub row: usize,
    /// Index of the highlighted row fragment.
    pub phrase: usize,
}

/// Which interactive counter an operation applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    Stitch,
    Row,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub desc: Descriptions,
    pub group_repeat: Option<Repeat>,
    pub row_repeat: Option<Repeat>,
    pub counters: Counters,
    /// Rendered row fragments; nested rows appear as `{` ... `}` fragments.
    pub row: Vec<String>,
    pub args: Vec<String>,
    /// The row as one comma-separated line.
    pub history_row: String,
}

impl State {
    /// A state whose phrase cursor rests on the first stitch fragment
    pub fn new(desc: Descriptions, row: Vec<String>, args: Vec<String>) -> Self {
        let mut state = State {
            desc,
            group_repeat: None,
            row_repeat: None,
            counters: Counters::default(),
            history_row: pretty_row(&row),
            row,
            args,
        };
        if let Some(first) = (0..state.row.len()).find(|&idx| state.is_phrase(idx)) {
            state.counters.phrase = first;
        }
        state
    }

    /// Whether the phrase cursor may rest on fragment `idx`
    fn is_phrase(&self, idx: usize) -> bool {
        self.row
            .get(idx)
            .is_some_and(|fragment| fragment != "{" && !fragment.starts_with('}'))
    }

    /// Move the phrase cursor to the next stitch fragment, if any
    pub fn move_phrase_right(&mut self) {
        let from = self.counters.phrase + 1;
        if let Some(idx) = (from..self.row.len()).find(|&idx| self.is_phrase(idx)) {
            self.counters.phrase = idx;
        }
    }

    /// Move the phrase cursor to the previous stitch fragment, if any
    pub fn move_phrase_left(&mut self) {
        let to = self.counters.phrase.min(self.row.len());
        if let Some(idx) = (0..to).rev().find(|&idx| self.is_phrase(idx)) {
            self.counters.phrase = idx;
        }
    }

    pub fn increment(&mut self, counter: Counter) {
        *self.counter_mut(counter) += 1;
    }

    /// Decrement, stopping at zero
    pub fn decrement(&mut self, counter: Counter) {
        let value = self.counter_mut(counter);
        *value = value.saturating_sub(1);
    }

    pub fn reset(&mut self, counter: Counter) {
        *self.counter_mut(counter) = 0;
    }

    pub fn counter(&self, counter: Counter) -> usize {
        match counter {
            Counter::Stitch => self.counters.stitch,
            Counter::Row => self.counters.row,
        }
    }

    fn counter_mut(&mut self, counter: Counter) -> &mut usize {
        match counter {
            Counter::Stitch => &mut self.counters.stitch,
            Counter::Row => &mut self.counters.row,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repeat = |r: Option<Repeat>| r.map_or_else(|| "-".to_string(), |r| r.to_string());
        writeln!(f, "----------------------")?;
        writeln!(f, "Block desc:\n{}", self.desc.block)?;
        writeln!(f, "Group desc ({}):\n{}", repeat(self.group_repeat), self.desc.group)?;
        writeln!(f, "Row desc ({}):\n{}", repeat(self.row_repeat), self.desc.row)?;
        writeln!(f, "Row:\n{}", self.history_row)?;
        write!(f, "Args:\n{}", self.args.join(", "))
    }
}
