//! Read-only views over a notebook.
//!
//! # Responsibility
//! - Build context windows around a target cell.
//! - Extract heuristic symbols from code cells.
//! - Render overview, cell detail and output views.

pub mod context;
pub mod render;
pub mod symbols;
