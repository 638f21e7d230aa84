//! Text search and replace over cell sources.
//!
//! # Responsibility
//! - Compile literal or regex patterns with optional case folding.
//! - Report matches with context, or substitute them.
//!
//! # Invariants
//! - A bad pattern is a report variant, not an error; nothing is mutated.

pub mod find;
pub mod pattern;
pub mod replace;

pub use find::{search_notebook, CellMatches, MatchHit, SearchReport};
pub use pattern::{compile_pattern, PatternError, PatternOptions};
pub use replace::{replace_in_notebook, CellReplacement, ReplaceReport};
