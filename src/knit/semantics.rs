//! Semantic passes over a parsed pattern
//!
//! Two pure walks over the immutable tree:
//!
//! 1. [`resolve`] collects aliases (`a := b`) and macro assignments (`a = ...`)
//!    into [`Resolutions`], which borrow from the tree.
//! 2. [`flatten`] renders the tree into [`Line`] records, expanding macros at
//!    every point of use and bracketing blocks, groups and rows with start/end
//!    sentinels for the state expander.

pub mod flattener;
pub mod lines;
pub mod resolver;

pub use flattener::{flatten, FlattenError};
pub use lines::{pretty_row, render_lines, Line, LineContent};
pub use resolver::{resolve, Resolutions};
