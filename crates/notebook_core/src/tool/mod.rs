//! Tool surface for agent clients.
//!
//! # Responsibility
//! - Map tool names to handlers that decode JSON parameters.
//! - Wrap every outcome in a `ToolResponse` envelope.
//!
//! # Invariants
//! - Handlers never panic; failures come back with `ok = false`.
//! - The registry is built explicitly; there is no global table.

mod handlers;
pub mod registry;

pub use registry::{ToolError, ToolHandler, ToolRegistry, ToolResponse, ToolSpec};
