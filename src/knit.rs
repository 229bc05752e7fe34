//! Main module for knit library functionality
//!
//! The pipeline runs lexer → parser → resolver → flattener → expander and
//! hands the resulting [`engine::Engine`] to the viewer.

pub mod ast;
pub mod engine;
pub mod lexer;
pub mod logging;
pub mod parser;
pub mod processor;
pub mod semantics;
