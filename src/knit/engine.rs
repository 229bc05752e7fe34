//! The navigable engine over an expanded pattern
//!
//! [`expander::expand`] unrolls the flattener's line records into [`State`]s.
//! An [`Engine`] holds those states with a cursor, and can write itself to a
//! JSON snapshot and be restored from one, so a session survives restarts:
//!
//! ```json
//! { "states": [ ... ], "index": 3 }
//! ```

pub mod expander;
pub mod state;

pub use expander::{expand, repeat_count, ExpandError, Scope};
pub use state::{Counter, Counters, Descriptions, Repeat, State};

use crate::knit::semantics::Line;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("state {index} is out of range: the pattern has {len} states")]
    OutOfRange { index: usize, len: usize },

    #[error("no snapshot file is configured")]
    NoSnapshotPath,

    #[error("cannot access snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed snapshot {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Expand(#[from] ExpandError),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Engine {
    states: Vec<State>,
    index: usize,
    /// Where [`Engine::save`] writes; not part of the snapshot itself.
    #[serde(skip)]
    states_file: Option<PathBuf>,
}

impl Engine {
    pub fn new(states: Vec<State>) -> Self {
        Engine {
            states,
            index: 0,
            states_file: None,
        }
    }

    /// Expand line records and wrap the result
    pub fn from_lines(lines: &[Line]) -> Result<Self, EngineError> {
        Ok(Engine::new(expand(lines)?))
    }

    /// Attach the snapshot path used by [`Engine::save`]
    pub fn with_states_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.states_file = Some(path.into());
        self
    }

    pub fn states_file(&self) -> Option<&Path> {
        self.states_file.as_deref()
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&State> {
        self.states.get(self.index)
    }

    pub fn current_mut(&mut self) -> Option<&mut State> {
        self.states.get_mut(self.index)
    }

    /// Advance one state; stays put on the last one.
    pub fn next(&mut self) -> Option<&State> {
        if self.index + 1 < self.states.len() {
            self.index += 1;
        }
        self.current()
    }

    /// Step back one state; stays put on the first one.
    pub fn previous(&mut self) -> Option<&State> {
        self.index = self.index.saturating_sub(1);
        self.current()
    }

    pub fn goto(&mut self, index: usize) -> Result<&State, EngineError> {
        let len = self.states.len();
        if index >= len {
            return Err(EngineError::OutOfRange { index, len });
        }
        self.index = index;
        Ok(&self.states[index])
    }

    pub fn first(&mut self) -> Option<&State> {
        self.index = 0;
        self.current()
    }

    pub fn last(&mut self) -> Option<&State> {
        self.index = self.states.len().saturating_sub(1);
        self.current()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write a snapshot of all states and the cursor to `path`
    pub fn save_to(&self, path: &Path) -> Result<(), EngineError> {
        let json = self.to_json().map_err(|source| EngineError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), states = self.len(), index = self.index, "saved snapshot");
        Ok(())
    }

    /// Write a snapshot to the attached states file
    pub fn save(&self) -> Result<(), EngineError> {
        let path = self.states_file.as_deref().ok_or(EngineError::NoSnapshotPath)?;
        self.save_to(path)
    }

    /// Restore an engine from a snapshot, attaching `path` as its states file.
    ///
    /// A cursor past the end is clamped to the last state.
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let text = fs::read_to_string(path).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut engine: Engine = serde_json::from_str(&text).map_err(|source| EngineError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        if engine.index >= engine.states.len() {
            debug!(index = engine.index, len = engine.states.len(), "clamping snapshot cursor");
            engine.index = engine.states.len().saturating_sub(1);
        }
        engine.states_file = Some(path.to_path_buf());
        Ok(engine)
    }
}
