//! Unrolls line records into the flat list of states
//!
//! The flattener brackets every group and row with start/end sentinels. This
//! pass walks those records with two independent stacks, one for groups and
//! one for rows, each entry remembering where in the output its scope began.
//! When a scope with a repeat count of N closes, the states emitted since its
//! start are appended N - 1 more times, and each copy's iteration counter for
//! that scope is bumped once per round.
//!
//! Iteration counters belong to the innermost repeated scope that set them, so
//! copying an outer scope leaves the counters of repeated inner scopes alone.

use crate::knit::engine::state::{Descriptions, Repeat, State};
use crate::knit::semantics::Line;
use std::fmt;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Group,
    Row,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Group => f.write_str("group"),
            Scope::Row => f.write_str("row"),
        }
    }
}

/// Malformed line records. Only a flattener bug produces these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpandError {
    #[error("end of {scope} at line record {index} has no matching start")]
    Unbalanced { scope: Scope, index: usize },
}

/// The repeat count written in a group or row bracket list.
///
/// Only a single non-negative integer argument counts; zero means none.
pub fn repeat_count(args: &[String]) -> Option<usize> {
    match args {
        [single] => single.parse::<usize>().ok().filter(|&n| n >= 1),
        _ => None,
    }
}

/// Which stack depth owns each counter of a state
#[derive(Debug, Clone, Copy, Default)]
struct Owners {
    group: Option<usize>,
    row: Option<usize>,
}

struct Frame {
    start: usize,
    max: Option<usize>,
    saved_repeat: Option<Repeat>,
    saved_owner: Option<usize>,
}

/// Repeat bookkeeping for one kind of scope
#[derive(Default)]
struct ScopeStack {
    frames: Vec<Frame>,
    repeat: Option<Repeat>,
    owner: Option<usize>,
}

impl ScopeStack {
    fn open(&mut self, start: usize, args: &[String]) {
        let max = repeat_count(args);
        self.frames.push(Frame {
            start,
            max,
            saved_repeat: self.repeat,
            saved_owner: self.owner,
        });
        if let Some(max) = max {
            self.repeat = Some(Repeat { current: 1, max });
            self.owner = Some(self.frames.len() - 1);
        }
    }

    /// Pop the innermost frame, restoring the enclosing scope's counter
    fn close(&mut self) -> Option<(Frame, usize)> {
        let frame = self.frames.pop()?;
        self.repeat = frame.saved_repeat;
        self.owner = frame.saved_owner;
        Some((frame, self.frames.len()))
    }
}

#[derive(Default)]
struct Expander {
    states: Vec<State>,
    owners: Vec<Owners>,
    desc: Descriptions,
    groups: ScopeStack,
    rows: ScopeStack,
}

/// Expand line records into states.
///
/// Records after the first end-of-block are ignored.
pub fn expand(lines: &[Line]) -> Result<Vec<State>, ExpandError> {
    let mut expander = Expander::default();
    for (index, line) in lines.iter().enumerate() {
        match line {
            Line::StartBlock { desc } => expander.desc.block = desc.join("\n"),
            Line::EndBlock => break,
            Line::StartGroup { desc, args } => {
                if !desc.is_empty() {
                    expander.desc.group = desc.join("\n");
                }
                debug!(depth = expander.groups.frames.len(), ?args, "start of group");
                let start = expander.states.len();
                expander.groups.open(start, args);
            }
            Line::EndGroup => expander.close(Scope::Group, index)?,
            Line::StartRow { desc, args } => {
                if !desc.is_empty() {
                    expander.desc.row = desc.join("\n");
                }
                let start = expander.states.len();
                expander.rows.open(start, args);
            }
            Line::EndRow => expander.close(Scope::Row, index)?,
            Line::Content(content) => {
                if !content.row.is_empty() {
                    let mut state =
                        State::new(expander.desc.clone(), content.row.clone(), content.args.clone());
                    state.group_repeat = expander.groups.repeat;
                    state.row_repeat = expander.rows.repeat;
                    expander.states.push(state);
                    expander.owners.push(Owners {
                        group: expander.groups.owner,
                        row: expander.rows.owner,
                    });
                }
            }
        }
    }
    debug!(states = expander.states.len(), "expanded pattern");
    Ok(expander.states)
}

impl Expander {
    fn close(&mut self, scope: Scope, index: usize) -> Result<(), ExpandError> {
        let stack = match scope {
            Scope::Group => &mut self.groups,
            Scope::Row => &mut self.rows,
        };
        let (frame, depth) = stack
            .close()
            .ok_or(ExpandError::Unbalanced { scope, index })?;

        let Some(max) = frame.max.filter(|&max| max >= 2) else {
            return Ok(());
        };
        debug!(%scope, depth, max, states = self.states.len() - frame.start, "repeating scope");

        let body = self.states[frame.start..].to_vec();
        let body_owners = self.owners[frame.start..].to_vec();
        for round in 1..max {
            for (state, owners) in body.iter().zip(&body_owners) {
                let mut copy = state.clone();
                let (repeat, owner) = match scope {
                    Scope::Group => (&mut copy.group_repeat, owners.group),
                    Scope::Row => (&mut copy.row_repeat, owners.row),
                };
                if owner == Some(depth) {
                    if let Some(repeat) = repeat {
                        repeat.current += round;
                    }
                }
                self.states.push(copy);
                self.owners.push(*owners);
            }
        }
        Ok(())
    }
}
