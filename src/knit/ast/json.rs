//! JSON and YAML encodings of a parsed pattern
//!
//! Every polymorphic node carries a `"type"` field naming its kind
//! (`BlockStmt`, `RowExpr`, ...). The root block is written in the same
//! tagged form so a file always starts with `"type": "BlockStmt"`.

use crate::knit::ast::statements::Block;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SerializationError {
    #[error("invalid pattern JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cannot encode pattern as YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum RootRef<'a> {
    BlockStmt(&'a Block),
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum Root {
    BlockStmt(Block),
}

/// Pretty-printed JSON for a root block
pub fn to_json(block: &Block) -> Result<String, SerializationError> {
    Ok(serde_json::to_string_pretty(&RootRef::BlockStmt(block))?)
}

pub fn from_json(json: &str) -> Result<Block, SerializationError> {
    let Root::BlockStmt(block) = serde_json::from_str(json)?;
    Ok(block)
}

pub fn to_yaml(block: &Block) -> Result<String, SerializationError> {
    Ok(serde_yaml::to_string(&RootRef::BlockStmt(block))?)
}

pub fn write_json(block: &Block, path: &Path) -> Result<(), SerializationError> {
    let json = to_json(block)?;
    fs::write(path, json).map_err(|source| SerializationError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn read_json(path: &Path) -> Result<Block, SerializationError> {
    let json = fs::read_to_string(path).map_err(|source| SerializationError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    from_json(&json)
}
