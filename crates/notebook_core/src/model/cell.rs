//! Cell domain model.
//!
//! # Responsibility
//! - Define the closed set of cell variants (`code`, `markdown`).
//! - Guard type-specific fields (`outputs`, `execution_count`) behind the
//!   `Code` variant so they can never be read off a markdown cell.
//!
//! # Invariants
//! - A markdown cell has no outputs and no execution count.
//! - Unknown per-cell keys are kept in `extra` and written back unchanged.

use super::multiline;
use super::output::Output;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Cell category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellType {
    /// Executable source with captured outputs.
    Code,
    /// Rendered prose.
    Markdown,
}

impl CellType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Markdown => "markdown",
        }
    }
}

impl Display for CellType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected `cell_type` text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCellType(pub String);

impl Display for UnknownCellType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown cell type `{}`; expected code|markdown", self.0)
    }
}

impl Error for UnknownCellType {}

impl FromStr for CellType {
    type Err = UnknownCellType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "code" => Ok(Self::Code),
            "markdown" => Ok(Self::Markdown),
            other => Err(UnknownCellType(other.to_string())),
        }
    }
}

/// One addressable notebook cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cell_type", rename_all = "snake_case")]
pub enum Cell {
    Code(CodeCell),
    Markdown(MarkdownCell),
}

/// Code cell payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CodeCell {
    /// nbformat 4.5+ cell id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[serde(default, with = "multiline")]
    pub source: String,
    #[serde(default)]
    pub outputs: Vec<Output>,
    #[serde(default)]
    pub execution_count: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Markdown cell payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MarkdownCell {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[serde(default, with = "multiline")]
    pub source: String,
    /// Unknown keys such as `attachments`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Cell {
    /// Creates an empty cell of `kind` holding `source`.
    ///
    /// # Invariants
    /// - Metadata starts empty.
    /// - Code cells start with no outputs and no execution count.
    pub fn new(kind: CellType, source: impl Into<String>) -> Self {
        match kind {
            CellType::Code => Self::code(source),
            CellType::Markdown => Self::markdown(source),
        }
    }

    pub fn code(source: impl Into<String>) -> Self {
        Self::Code(CodeCell {
            source: source.into(),
            ..CodeCell::default()
        })
    }

    pub fn markdown(source: impl Into<String>) -> Self {
        Self::Markdown(MarkdownCell {
            source: source.into(),
            ..MarkdownCell::default()
        })
    }

    /// Sets the cell id, replacing any previous one.
    pub fn with_id(mut self, id: Option<String>) -> Self {
        match &mut self {
            Self::Code(cell) => cell.id = id,
            Self::Markdown(cell) => cell.id = id,
        }
        self
    }

    pub fn cell_type(&self) -> CellType {
        match self {
            Self::Code(_) => CellType::Code,
            Self::Markdown(_) => CellType::Markdown,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Code(cell) => cell.id.as_deref(),
            Self::Markdown(cell) => cell.id.as_deref(),
        }
    }

    pub fn source(&self) -> &str {
        match self {
            Self::Code(cell) => &cell.source,
            Self::Markdown(cell) => &cell.source,
        }
    }

    /// Replaces the source text; metadata and outputs are untouched.
    pub fn set_source(&mut self, source: impl Into<String>) {
        let source = source.into();
        match self {
            Self::Code(cell) => cell.source = source,
            Self::Markdown(cell) => cell.source = source,
        }
    }

    pub fn metadata(&self) -> &Map<String, Value> {
        match self {
            Self::Code(cell) => &cell.metadata,
            Self::Markdown(cell) => &cell.metadata,
        }
    }

    pub fn metadata_mut(&mut self) -> &mut Map<String, Value> {
        match self {
            Self::Code(cell) => &mut cell.metadata,
            Self::Markdown(cell) => &mut cell.metadata,
        }
    }

    /// Outputs of a code cell; always empty for markdown.
    pub fn outputs(&self) -> &[Output] {
        match self {
            Self::Code(cell) => &cell.outputs,
            Self::Markdown(_) => &[],
        }
    }

    /// Execution counter of a code cell; always `None` for markdown.
    pub fn execution_count(&self) -> Option<i64> {
        match self {
            Self::Code(cell) => cell.execution_count,
            Self::Markdown(_) => None,
        }
    }
}
