//! Pattern sources and lexical errors

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures setting up the lexer. Once built, the lexer itself never fails.
#[derive(Debug, Error)]
pub enum LexError {
    #[error("no pattern sources given")]
    NoSources,
    #[error("cannot read pattern source {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// One named pattern text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub name: String,
    pub text: String,
}

impl Source {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Source {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Read a source from disk, named after its path
    pub fn read(path: &Path) -> Result<Self, LexError> {
        let text = fs::read_to_string(path).map_err(|source| LexError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Source::new(path.display().to_string(), text))
    }
}
