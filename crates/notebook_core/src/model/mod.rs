//! Notebook domain model.
//!
//! # Responsibility
//! - Define the in-memory shape of a notebook: ordered cells plus metadata.
//! - Map that shape onto nbformat v4 JSON through serde.
//!
//! # Invariants
//! - Cells are a closed `code | markdown` union.
//! - Fields the core never touches are preserved across load/save.

pub mod cell;
pub mod multiline;
pub mod notebook;
pub mod output;
