//! Context windows around a target cell.
//!
//! # Invariants
//! - The window is `[target - radius, target + radius]` clipped to the
//!   document; it is never wrapped or padded.
//! - Exactly one cell in the window has `is_target = true`.
//! - Output summaries are condensed: long text is truncated and tracebacks
//!   are omitted.

use crate::edit::bounds::{validate_cell_index, IndexOutOfRange};
use crate::model::cell::{Cell, CellType};
use crate::model::notebook::Notebook;
use crate::model::output::Output;
use crate::text::truncate;
use serde::Serialize;

/// Maximum characters kept from any output text.
pub const OUTPUT_TEXT_CHARS: usize = 200;

/// Serializable context bundle for one target cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextBundle {
    pub notebook: String,
    pub total_cells: usize,
    pub range: ContextRange,
    pub cells: Vec<ContextCell>,
}

/// Half-open index range `[start, end)` covered by a bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContextRange {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextCell {
    pub index: usize,
    pub cell_type: CellType,
    pub source: String,
    pub is_target: bool,
    /// Present only for code cells.
    #[serde(flatten)]
    pub code: Option<CodeContext>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeContext {
    pub execution_count: Option<i64>,
    pub outputs: Vec<OutputSummary>,
}

/// Condensed view of one output record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "output_type", rename_all = "snake_case")]
pub enum OutputSummary {
    Stream {
        name: String,
        text: String,
    },
    ExecuteResult {
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
    DisplayData {
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
    Error {
        ename: String,
        evalue: String,
    },
}

impl OutputSummary {
    pub fn from_output(output: &Output) -> Self {
        let plain = || {
            output
                .plain_text()
                .map(|text| truncate(&text, OUTPUT_TEXT_CHARS))
        };
        match output {
            Output::Stream(stream) => Self::Stream {
                name: stream.name.clone(),
                text: truncate(&stream.text, OUTPUT_TEXT_CHARS),
            },
            Output::ExecuteResult(_) => Self::ExecuteResult { text: plain() },
            Output::DisplayData(_) => Self::DisplayData { text: plain() },
            Output::Error(error) => Self::Error {
                ename: error.ename.clone(),
                evalue: error.evalue.clone(),
            },
        }
    }
}

/// Builds the context window of `radius` cells on each side of `target`.
pub fn cell_context(
    notebook: &Notebook,
    notebook_name: impl Into<String>,
    target: i64,
    radius: usize,
) -> Result<ContextBundle, IndexOutOfRange> {
    let target = validate_cell_index(notebook.len(), target)?;
    let start = target.saturating_sub(radius);
    let end = notebook
        .len()
        .min(target.saturating_add(radius).saturating_add(1));

    let cells = notebook.cells[start..end]
        .iter()
        .enumerate()
        .map(|(offset, cell)| {
            let index = start + offset;
            context_cell(cell, index, index == target)
        })
        .collect();

    Ok(ContextBundle {
        notebook: notebook_name.into(),
        total_cells: notebook.len(),
        range: ContextRange { start, end },
        cells,
    })
}

fn context_cell(cell: &Cell, index: usize, is_target: bool) -> ContextCell {
    let code = match cell {
        Cell::Code(code) => Some(CodeContext {
            execution_count: code.execution_count,
            outputs: code.outputs.iter().map(OutputSummary::from_output).collect(),
        }),
        Cell::Markdown(_) => None,
    };
    ContextCell {
        index,
        cell_type: cell.cell_type(),
        source: cell.source().to_string(),
        is_target,
        code,
    }
}
