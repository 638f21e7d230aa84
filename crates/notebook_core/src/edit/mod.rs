//! Editing engine.
//!
//! # Responsibility
//! - Validate cell indices and insertion slots against current length.
//! - Apply exactly one structural or metadata change to a notebook value.
//! - Return a typed summary of what changed.
//!
//! # Invariants
//! - Validation happens before any mutation.
//! - Nothing here touches storage; persistence belongs to the service layer.

pub mod bounds;
pub mod metadata;
pub mod ops;
