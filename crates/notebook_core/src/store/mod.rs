//! Document store adapters.
//!
//! # Responsibility
//! - Define the load/save contract the service layer depends on.
//! - Keep storage format details (nbformat JSON, in-memory maps) out of the
//!   editing and query engines.
//!
//! # Invariants
//! - `load` always returns fresh state; stores never hand out shared caches.
//! - `save` preserves every field the caller did not change.
//! - Paths are opaque keys in the store's namespace and are passed through.

use crate::model::notebook::Notebook;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod file_store;
pub mod memory_store;

pub use file_store::FileNotebookStore;
pub use memory_store::MemoryNotebookStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage-layer failure. Propagated unchanged by the service layer.
#[derive(Debug)]
pub enum StoreError {
    /// Nothing stored under `path`.
    NotFound(String),
    /// Underlying read/write failure.
    Io {
        path: String,
        source: std::io::Error,
    },
    /// Stored bytes are not a valid notebook document.
    Malformed {
        path: String,
        source: serde_json::Error,
    },
    /// In-memory notebook could not be encoded.
    Serialize {
        path: String,
        source: serde_json::Error,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "notebook not found: `{path}`"),
            Self::Io { path, source } => write!(f, "notebook I/O failed for `{path}`: {source}"),
            Self::Malformed { path, source } => {
                write!(f, "malformed notebook `{path}`: {source}")
            }
            Self::Serialize { path, source } => {
                write!(f, "failed to encode notebook `{path}`: {source}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Io { source, .. } => Some(source),
            Self::Malformed { source, .. } => Some(source),
            Self::Serialize { source, .. } => Some(source),
        }
    }
}

/// Load/save contract for notebook documents.
pub trait NotebookStore {
    fn load(&self, path: &str) -> StoreResult<Notebook>;
    fn save(&self, notebook: &Notebook, path: &str) -> StoreResult<()>;
}

impl<T: NotebookStore + ?Sized> NotebookStore for &T {
    fn load(&self, path: &str) -> StoreResult<Notebook> {
        (**self).load(path)
    }

    fn save(&self, notebook: &Notebook, path: &str) -> StoreResult<()> {
        (**self).save(notebook, path)
    }
}
