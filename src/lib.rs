//! # knit
//!
//! A compiler for the knit pattern language. Pattern sources are lexed,
//! parsed into a tree, resolved, flattened into line records and unrolled
//! into a flat list of states that the `knit` viewer steps through.
//!
//! ```text
//! ; Hat
//! rib = k(1) p(1)
//! {
//!   rib
//! }(3)
//! ```
//!
//! See [`knit::processor`] for the end-to-end entry points.

pub mod knit;
