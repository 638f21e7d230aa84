//! Notebook document model.
//!
//! # Invariants
//! - `cells` order is the reading/execution order.
//! - Format version and unknown top-level keys pass through untouched.

use super::cell::Cell;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

const DEFAULT_NBFORMAT: u32 = 4;
const DEFAULT_NBFORMAT_MINOR: u32 = 5;
/// nbformat generates 8-hex-char cell ids.
const CELL_ID_LEN: usize = 8;

/// A whole notebook document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    #[serde(default)]
    pub cells: Vec<Cell>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[serde(default = "default_nbformat")]
    pub nbformat: u32,
    #[serde(default = "default_nbformat_minor")]
    pub nbformat_minor: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Notebook {
    fn default() -> Self {
        Self::new()
    }
}

impl Notebook {
    /// Creates an empty v4.5 notebook.
    pub fn new() -> Self {
        Self {
            cells: Vec::new(),
            metadata: Map::new(),
            nbformat: DEFAULT_NBFORMAT,
            nbformat_minor: DEFAULT_NBFORMAT_MINOR,
            extra: Map::new(),
        }
    }

    /// Creates a v4.5 notebook holding `cells`.
    pub fn with_cells(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            ..Self::new()
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether this format version carries per-cell ids (nbformat >= 4.5).
    pub fn uses_cell_ids(&self) -> bool {
        self.nbformat > DEFAULT_NBFORMAT
            || (self.nbformat == DEFAULT_NBFORMAT && self.nbformat_minor >= DEFAULT_NBFORMAT_MINOR)
    }

    /// Returns a fresh cell id when the format carries ids.
    pub fn new_cell_id(&self) -> Option<String> {
        if !self.uses_cell_ids() {
            return None;
        }
        let simple = Uuid::new_v4().simple().to_string();
        Some(simple[..CELL_ID_LEN].to_string())
    }

    /// Kernel display name from `metadata.kernelspec`.
    ///
    /// Returns `None` without a kernelspec and `"Unknown"` when the kernelspec
    /// has no display name.
    pub fn kernel_display_name(&self) -> Option<&str> {
        let kernelspec = self.metadata.get("kernelspec")?;
        Some(
            kernelspec
                .get("display_name")
                .and_then(Value::as_str)
                .unwrap_or("Unknown"),
        )
    }
}

fn default_nbformat() -> u32 {
    DEFAULT_NBFORMAT
}

fn default_nbformat_minor() -> u32 {
    DEFAULT_NBFORMAT_MINOR
}

#[cfg(test)]
mod tests {
    use super::Notebook;
    use serde_json::json;

    #[test]
    fn new_cell_id_follows_format_version() {
        let mut notebook = Notebook::new();
        let id = notebook.new_cell_id().expect("v4.5 notebooks carry ids");
        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));

        notebook.nbformat_minor = 4;
        assert_eq!(notebook.new_cell_id(), None);
    }

    #[test]
    fn kernel_display_name_falls_back_to_unknown() {
        let mut notebook = Notebook::new();
        assert_eq!(notebook.kernel_display_name(), None);

        notebook
            .metadata
            .insert("kernelspec".to_string(), json!({"name": "python3"}));
        assert_eq!(notebook.kernel_display_name(), Some("Unknown"));

        notebook.metadata.insert(
            "kernelspec".to_string(),
            json!({"name": "python3", "display_name": "Python 3"}),
        );
        assert_eq!(notebook.kernel_display_name(), Some("Python 3"));
    }
}
