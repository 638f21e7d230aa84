//! In-process notebook store keyed by path.
//!
//! Used by tests and embedders that keep documents in memory. `load` returns
//! a clone so callers never share state across operations.

use super::{NotebookStore, StoreError, StoreResult};
use crate::model::notebook::Notebook;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct MemoryState {
    documents: HashMap<String, Notebook>,
    save_count: usize,
}

/// Map-backed store with a save counter.
#[derive(Debug, Default)]
pub struct MemoryNotebookStore {
    state: Mutex<MemoryState>,
}

impl MemoryNotebookStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds `path` with `notebook` without counting it as a save.
    pub fn insert(&self, path: impl Into<String>, notebook: Notebook) {
        self.lock().documents.insert(path.into(), notebook);
    }

    /// Returns a copy of the stored document.
    pub fn get(&self, path: &str) -> Option<Notebook> {
        self.lock().documents.get(path).cloned()
    }

    /// Number of successful `save` calls so far.
    pub fn save_count(&self) -> usize {
        self.lock().save_count
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl NotebookStore for MemoryNotebookStore {
    fn load(&self, path: &str) -> StoreResult<Notebook> {
        self.lock()
            .documents
            .get(path)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(path.to_string()))
    }

    fn save(&self, notebook: &Notebook, path: &str) -> StoreResult<()> {
        let mut state = self.lock();
        state.documents.insert(path.to_string(), notebook.clone());
        state.save_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryNotebookStore;
    use crate::model::cell::Cell;
    use crate::model::notebook::Notebook;
    use crate::store::{NotebookStore, StoreError};

    #[test]
    fn load_returns_independent_copies() {
        let store = MemoryNotebookStore::new();
        store.insert("a.ipynb", Notebook::with_cells(vec![Cell::code("x = 1")]));

        let mut first = store.load("a.ipynb").unwrap();
        first.cells.clear();
        let second = store.load("a.ipynb").unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn missing_path_is_not_found() {
        let store = MemoryNotebookStore::new();
        let err = store.load("missing.ipynb").unwrap_err();
        assert!(matches!(err, StoreError::NotFound(path) if path == "missing.ipynb"));
    }
}
