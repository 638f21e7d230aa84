//! Human-readable read views: notebook overview, cell detail, cell outputs.

use crate::edit::bounds::{validate_cell_index, IndexOutOfRange};
use crate::model::cell::CellType;
use crate::model::notebook::Notebook;
use crate::model::output::Output;
use crate::text::preview;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};
use std::path::Path;

const OVERVIEW_PREVIEW_CHARS: usize = 50;
const RULE: &str = "------------------------------------------------------------";

static ANSI_ESCAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\x1b\[[0-9;?]*[A-Za-z]").expect("valid ansi escape regex"));

/// Display name for a store path: its final component, or the path itself.
pub fn document_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

/// Removes terminal color/control sequences from traceback text.
pub fn strip_ansi(text: &str) -> String {
    ANSI_ESCAPE_RE.replace_all(text, "").into_owned()
}

/// One line of the notebook overview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellLine {
    pub index: usize,
    pub cell_type: CellType,
    pub preview: String,
}

/// Structural summary returned by `read_notebook`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotebookOverview {
    pub name: String,
    pub total_cells: usize,
    pub kernel: Option<String>,
    pub cells: Vec<CellLine>,
}

impl Display for NotebookOverview {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Notebook: {}", self.name)?;
        writeln!(f, "  total cells: {}", self.total_cells)?;
        if let Some(kernel) = &self.kernel {
            writeln!(f, "  kernel: {kernel}")?;
        }
        write!(f, "\nCells:\n{RULE}")?;
        for line in &self.cells {
            write!(f, "\n[{}] {}: {}", line.index, line.cell_type, line.preview)?;
        }
        Ok(())
    }
}

pub fn overview(notebook: &Notebook, name: impl Into<String>) -> NotebookOverview {
    NotebookOverview {
        name: name.into(),
        total_cells: notebook.len(),
        kernel: notebook.kernel_display_name().map(str::to_string),
        cells: notebook
            .cells
            .iter()
            .enumerate()
            .map(|(index, cell)| CellLine {
                index,
                cell_type: cell.cell_type(),
                preview: preview(cell.source(), OVERVIEW_PREVIEW_CHARS, " "),
            })
            .collect(),
    }
}

/// Full view of one cell returned by `read_cell`.
#[derive(Debug, Clone, PartialEq)]
pub struct CellDetail {
    pub index: usize,
    pub cell_type: CellType,
    pub source: String,
    pub metadata: Map<String, Value>,
    /// `(output_type, count)` in first-seen order.
    pub output_tally: Vec<(&'static str, usize)>,
}

impl CellDetail {
    pub fn output_count(&self) -> usize {
        self.output_tally.iter().map(|(_, count)| count).sum()
    }
}

impl Display for CellDetail {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Cell #{}", self.index)?;
        writeln!(f, "  type: {}", self.cell_type)?;
        write!(f, "\nSource:\n{RULE}\n{}\n{RULE}", self.source)?;

        if !self.metadata.is_empty() {
            let rendered = serde_json::to_string_pretty(&self.metadata)
                .unwrap_or_else(|_| Value::Object(self.metadata.clone()).to_string());
            write!(f, "\n\nMetadata:\n{rendered}")?;
        }

        if !self.output_tally.is_empty() {
            let tally = self
                .output_tally
                .iter()
                .map(|(kind, count)| format!("{kind}: {count}"))
                .collect::<Vec<_>>()
                .join(", ");
            write!(f, "\n\nOutputs: {} ({tally})", self.output_count())?;
        }
        Ok(())
    }
}

pub fn cell_detail(notebook: &Notebook, index: i64) -> Result<CellDetail, IndexOutOfRange> {
    let index = validate_cell_index(notebook.len(), index)?;
    let cell = &notebook.cells[index];

    let mut output_tally: Vec<(&'static str, usize)> = Vec::new();
    for output in cell.outputs() {
        let kind = output.type_name();
        match output_tally.iter_mut().find(|(seen, _)| *seen == kind) {
            Some((_, count)) => *count += 1,
            None => output_tally.push((kind, 1)),
        }
    }

    Ok(CellDetail {
        index,
        cell_type: cell.cell_type(),
        source: cell.source().to_string(),
        metadata: cell.metadata().clone(),
        output_tally,
    })
}

/// One output rendered for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedOutput {
    pub header: String,
    pub body: String,
}

/// Rendered outputs of one cell, returned by `read_cell_output`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellOutputs {
    pub index: usize,
    pub outputs: Vec<RenderedOutput>,
}

impl Display for CellOutputs {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.outputs.is_empty() {
            return write!(f, "Cell #{} has no output.", self.index);
        }
        write!(f, "Cell #{} outputs: {}", self.index, self.outputs.len())?;
        for (position, output) in self.outputs.iter().enumerate() {
            write!(f, "\n\n[{position}] {}\n{}", output.header, output.body)?;
        }
        Ok(())
    }
}

pub fn cell_outputs(notebook: &Notebook, index: i64) -> Result<CellOutputs, IndexOutOfRange> {
    let index = validate_cell_index(notebook.len(), index)?;
    let outputs = notebook.cells[index]
        .outputs()
        .iter()
        .map(render_output)
        .collect();
    Ok(CellOutputs { index, outputs })
}

fn render_output(output: &Output) -> RenderedOutput {
    match output {
        Output::Stream(stream) => RenderedOutput {
            header: format!("stream ({})", stream.name),
            body: stream.text.clone(),
        },
        Output::ExecuteResult(_) | Output::DisplayData(_) => RenderedOutput {
            header: output.type_name().to_string(),
            body: output.plain_text().unwrap_or_else(|| {
                let mime_types = output
                    .data()
                    .map(|data| data.keys().cloned().collect::<Vec<_>>().join(", "))
                    .unwrap_or_default();
                format!("[non-text output: {mime_types}]")
            }),
        },
        Output::Error(error) => {
            let mut body = format!("{}: {}", error.ename, error.evalue);
            for line in &error.traceback {
                body.push('\n');
                body.push_str(&strip_ansi(line));
            }
            RenderedOutput {
                header: "error".to_string(),
                body,
            }
        }
    }
}
