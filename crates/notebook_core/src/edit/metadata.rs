//! Metadata assignment for notebooks and cells.
//!
//! Raw values are parsed as JSON first. Text that is not valid JSON is stored
//! as a plain string; that fallback is silent and never an error.

use super::bounds::{validate_cell_index, IndexOutOfRange};
use crate::model::notebook::Notebook;
use serde_json::Value;
use std::fmt::{Display, Formatter};

/// Where a metadata entry was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataTarget {
    Notebook,
    Cell(usize),
}

/// Result of a metadata assignment, carrying the resolved value.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataSummary {
    pub target: MetadataTarget,
    pub key: String,
    pub value: Value,
}

impl Display for MetadataSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let value = display_value(&self.value);
        match self.target {
            MetadataTarget::Notebook => {
                write!(f, "Updated notebook metadata: {} = {}", self.key, value)
            }
            MetadataTarget::Cell(index) => {
                write!(f, "Updated cell #{} metadata: {} = {}", index, self.key, value)
            }
        }
    }
}

/// Parses `raw` as JSON, falling back to the literal text.
pub fn parse_metadata_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

pub fn set_notebook_metadata(
    notebook: &mut Notebook,
    key: impl Into<String>,
    raw: &str,
) -> MetadataSummary {
    let key = key.into();
    let value = parse_metadata_value(raw);
    notebook.metadata.insert(key.clone(), value.clone());
    MetadataSummary {
        target: MetadataTarget::Notebook,
        key,
        value,
    }
}

pub fn set_cell_metadata(
    notebook: &mut Notebook,
    index: i64,
    key: impl Into<String>,
    raw: &str,
) -> Result<MetadataSummary, IndexOutOfRange> {
    let index = validate_cell_index(notebook.len(), index)?;
    let key = key.into();
    let value = parse_metadata_value(raw);
    notebook.cells[index]
        .metadata_mut()
        .insert(key.clone(), value.clone());
    Ok(MetadataSummary {
        target: MetadataTarget::Cell(index),
        key,
        value,
    })
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_metadata_value, set_notebook_metadata};
    use crate::model::notebook::Notebook;
    use serde_json::json;

    #[test]
    fn quoted_and_unquoted_text_resolve_to_same_string() {
        assert_eq!(parse_metadata_value("\"title\""), json!("title"));
        assert_eq!(parse_metadata_value("title"), json!("title"));
    }

    #[test]
    fn structured_values_are_parsed() {
        assert_eq!(parse_metadata_value("42"), json!(42));
        assert_eq!(parse_metadata_value("{\"a\": [1, true]}"), json!({"a": [1, true]}));
        assert_eq!(parse_metadata_value("{broken"), json!("{broken"));
    }

    #[test]
    fn notebook_metadata_overwrites_existing_key() {
        let mut notebook = Notebook::new();
        set_notebook_metadata(&mut notebook, "title", "first");
        let summary = set_notebook_metadata(&mut notebook, "title", "[1,2]");
        assert_eq!(notebook.metadata["title"], json!([1, 2]));
        assert_eq!(summary.to_string(), "Updated notebook metadata: title = [1,2]");
    }
}
