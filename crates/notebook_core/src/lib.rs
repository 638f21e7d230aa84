//! Core engine for inspecting and editing Jupyter notebooks.
//! Every operation reloads the document from its store; no state is kept between calls.

pub mod config;
pub mod edit;
pub mod inspect;
pub mod logging;
pub mod model;
pub mod search;
pub mod service;
pub mod store;
pub mod text;
pub mod tool;

pub use config::CoreConfig;
pub use edit::bounds::{IndexKind, IndexOutOfRange};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status, LoggingError};
pub use model::cell::{Cell, CellType, CodeCell, MarkdownCell};
pub use model::notebook::Notebook;
pub use model::output::Output;
pub use search::{PatternError, PatternOptions, ReplaceReport, SearchReport};
pub use service::notebook_service::{NotebookError, NotebookResult, NotebookService};
pub use store::{FileNotebookStore, MemoryNotebookStore, NotebookStore, StoreError, StoreResult};
pub use tool::{ToolError, ToolRegistry, ToolResponse, ToolSpec};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
