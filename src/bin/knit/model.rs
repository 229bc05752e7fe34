//! Data model for the viewer
//!
//! The Model owns the [`Engine`] being stepped through plus the one line of
//! feedback shown in the status bar. Rendering reads it; key handling in
//! [`crate::app`] mutates it through the methods below.

use knit::knit::engine::{Counter, Engine, State};
use std::path::Path;
use tracing::{info, warn};

/// How a counter key changes its counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterOp {
    Increment,
    Decrement,
    Reset,
}

pub struct Model {
    engine: Engine,
    /// Shown in the title bar; usually the first input's file name.
    pub name: String,
    /// Feedback from the last action, cleared on the next key.
    pub status: Option<String>,
}

impl Model {
    pub fn new(engine: Engine, name: impl Into<String>) -> Self {
        Model {
            engine,
            name: name.into(),
            status: None,
        }
    }

    pub fn current(&self) -> Option<&State> {
        self.engine.current()
    }

    /// 1-based position for display, 0 when there are no states
    pub fn position(&self) -> (usize, usize) {
        if self.engine.is_empty() {
            (0, 0)
        } else {
            (self.engine.index() + 1, self.engine.len())
        }
    }

    pub fn next(&mut self) {
        self.engine.next();
    }

    pub fn previous(&mut self) {
        self.engine.previous();
    }

    pub fn first(&mut self) {
        self.engine.first();
    }

    pub fn last(&mut self) {
        self.engine.last();
    }

    pub fn phrase_right(&mut self) {
        if let Some(state) = self.engine.current_mut() {
            state.move_phrase_right();
        }
    }

    pub fn phrase_left(&mut self) {
        if let Some(state) = self.engine.current_mut() {
            state.move_phrase_left();
        }
    }

    pub fn count(&mut self, counter: Counter, op: CounterOp) {
        if let Some(state) = self.engine.current_mut() {
            match op {
                CounterOp::Increment => state.increment(counter),
                CounterOp::Decrement => state.decrement(counter),
                CounterOp::Reset => state.reset(counter),
            }
        }
    }

    /// Write the snapshot to the engine's states file and report the
    /// outcome in the status bar
    pub fn save(&mut self) {
        self.status = match self.engine.save() {
            Ok(()) => {
                let path = self.engine.states_file().unwrap_or(Path::new(""));
                info!(path = %path.display(), "snapshot written");
                Some(format!("saved {}", path.display()))
            }
            Err(e) => {
                warn!(error = %e, "snapshot failed");
                Some(format!("save failed: {}", e))
            }
        };
    }

    /// Hand the engine back once the viewer is done with it
    pub fn into_engine(self) -> Engine {
        self.engine
    }
}
