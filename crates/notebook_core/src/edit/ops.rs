//! Structural cell operations on an in-memory notebook.
//!
//! # Invariants
//! - Every index is validated before the notebook is touched; a rejected call
//!   leaves the notebook unchanged.
//! - `move_cell` uses remove-then-insert: `to` addresses the sequence after
//!   the moved cell was taken out.
//! - Duplicates and retyped cells never carry outputs.

use super::bounds::{validate_cell_index, validate_insert_position, IndexOutOfRange};
use crate::model::cell::{Cell, CellType};
use crate::model::notebook::Notebook;
use crate::text::preview;
use std::fmt::{Display, Formatter};

const PREVIEW_CHARS: usize = 30;

fn short_preview(source: &str) -> String {
    preview(source, PREVIEW_CHARS, " ")
}

/// Result of [`insert_cell`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertSummary {
    pub cell_type: CellType,
    pub position: usize,
    pub total_cells: usize,
}

impl Display for InsertSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Added {} cell at position {} (total cells: {})",
            self.cell_type, self.position, self.total_cells
        )
    }
}

/// Result of [`update_cell`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateSummary {
    pub index: usize,
    pub before: String,
    pub after: String,
}

impl Display for UpdateSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Updated cell #{}\n  before: {}\n  after: {}",
            self.index, self.before, self.after
        )
    }
}

/// Result of [`delete_cell`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteSummary {
    pub index: usize,
    pub removed: String,
    pub total_cells: usize,
}

impl Display for DeleteSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Deleted cell #{}\n  removed: {}\n  remaining cells: {}",
            self.index, self.removed, self.total_cells
        )
    }
}

/// Result of [`move_cell`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveSummary {
    pub from: usize,
    pub to: usize,
    pub preview: String,
}

impl Display for MoveSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Moved cell {} -> {}\n  content: {}",
            self.from, self.to, self.preview
        )
    }
}

/// Result of [`duplicate_cell`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateSummary {
    pub source_index: usize,
    pub new_index: usize,
    pub preview: String,
    pub total_cells: usize,
}

impl Display for DuplicateSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Duplicated cell #{} as #{} (total cells: {})\n  content: {}",
            self.source_index, self.new_index, self.total_cells, self.preview
        )
    }
}

/// Result of [`change_cell_type`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeTypeSummary {
    /// The cell already had the requested type; nothing changed.
    Unchanged { index: usize, cell_type: CellType },
    Changed {
        index: usize,
        from: CellType,
        to: CellType,
    },
}

impl ChangeTypeSummary {
    pub fn changed(&self) -> bool {
        matches!(self, Self::Changed { .. })
    }
}

impl Display for ChangeTypeSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unchanged { index, cell_type } => {
                write!(f, "Cell #{index} is already this type ({cell_type}); no change")
            }
            Self::Changed { index, from, to } => {
                write!(f, "Changed cell #{index} type: {from} -> {to}")
            }
        }
    }
}

/// Inserts a new empty-metadata cell; `position = None` appends.
pub fn insert_cell(
    notebook: &mut Notebook,
    cell_type: CellType,
    source: impl Into<String>,
    position: Option<i64>,
) -> Result<InsertSummary, IndexOutOfRange> {
    let position = validate_insert_position(notebook.len(), position)?;
    let cell = Cell::new(cell_type, source).with_id(notebook.new_cell_id());
    notebook.cells.insert(position, cell);
    Ok(InsertSummary {
        cell_type,
        position,
        total_cells: notebook.len(),
    })
}

/// Replaces the source of one cell in place.
pub fn update_cell(
    notebook: &mut Notebook,
    index: i64,
    source: impl Into<String>,
) -> Result<UpdateSummary, IndexOutOfRange> {
    let index = validate_cell_index(notebook.len(), index)?;
    let source = source.into();
    let cell = &mut notebook.cells[index];
    let before = short_preview(cell.source());
    let after = short_preview(&source);
    cell.set_source(source);
    Ok(UpdateSummary {
        index,
        before,
        after,
    })
}

pub fn delete_cell(notebook: &mut Notebook, index: i64) -> Result<DeleteSummary, IndexOutOfRange> {
    let index = validate_cell_index(notebook.len(), index)?;
    let removed = notebook.cells.remove(index);
    Ok(DeleteSummary {
        index,
        removed: short_preview(removed.source()),
        total_cells: notebook.len(),
    })
}

/// Moves one cell using remove-then-insert semantics.
///
/// `[A, B, C]` with `from = 0, to = 2` becomes `[B, C, A]`.
pub fn move_cell(
    notebook: &mut Notebook,
    from: i64,
    to: i64,
) -> Result<MoveSummary, IndexOutOfRange> {
    let from = validate_cell_index(notebook.len(), from)?;
    let to = validate_cell_index(notebook.len(), to)?;
    let cell = notebook.cells.remove(from);
    let preview = short_preview(cell.source());
    notebook.cells.insert(to, cell);
    Ok(MoveSummary { from, to, preview })
}

/// Copies type, source and metadata into a new cell right after `index`.
pub fn duplicate_cell(
    notebook: &mut Notebook,
    index: i64,
) -> Result<DuplicateSummary, IndexOutOfRange> {
    let index = validate_cell_index(notebook.len(), index)?;
    let original = &notebook.cells[index];
    let mut copy = Cell::new(original.cell_type(), original.source());
    *copy.metadata_mut() = original.metadata().clone();
    let preview = short_preview(copy.source());
    let copy = copy.with_id(notebook.new_cell_id());

    let new_index = index + 1;
    notebook.cells.insert(new_index, copy);
    Ok(DuplicateSummary {
        source_index: index,
        new_index,
        preview,
        total_cells: notebook.len(),
    })
}

/// Rebuilds the cell at `index` as `cell_type`, keeping source and metadata.
pub fn change_cell_type(
    notebook: &mut Notebook,
    index: i64,
    cell_type: CellType,
) -> Result<ChangeTypeSummary, IndexOutOfRange> {
    let index = validate_cell_index(notebook.len(), index)?;
    let current = &notebook.cells[index];
    let from = current.cell_type();
    if from == cell_type {
        return Ok(ChangeTypeSummary::Unchanged { index, cell_type });
    }

    let mut rebuilt = Cell::new(cell_type, current.source());
    *rebuilt.metadata_mut() = current.metadata().clone();
    let rebuilt = rebuilt.with_id(notebook.new_cell_id());
    notebook.cells[index] = rebuilt;
    Ok(ChangeTypeSummary::Changed {
        index,
        from,
        to: cell_type,
    })
}

#[cfg(test)]
mod tests {
    use super::{change_cell_type, duplicate_cell, insert_cell, move_cell, update_cell};
    use crate::model::cell::{Cell, CellType};
    use crate::model::notebook::Notebook;
    use crate::model::output::Output;

    fn sources(notebook: &Notebook) -> Vec<&str> {
        notebook.cells.iter().map(Cell::source).collect()
    }

    #[test]
    fn move_uses_remove_then_insert() {
        let mut notebook =
            Notebook::with_cells(vec![Cell::code("A"), Cell::code("B"), Cell::code("C")]);
        move_cell(&mut notebook, 0, 2).unwrap();
        assert_eq!(sources(&notebook), vec!["B", "C", "A"]);

        move_cell(&mut notebook, 2, 0).unwrap();
        assert_eq!(sources(&notebook), vec!["A", "B", "C"]);

        move_cell(&mut notebook, 2, 1).unwrap();
        assert_eq!(sources(&notebook), vec!["A", "C", "B"]);
    }

    #[test]
    fn move_rejects_insertion_slot_as_target() {
        let mut notebook = Notebook::with_cells(vec![Cell::code("A"), Cell::code("B")]);
        assert!(move_cell(&mut notebook, 0, 2).is_err());
        assert_eq!(sources(&notebook), vec!["A", "B"]);
    }

    #[test]
    fn insert_assigns_cell_id_for_v45_notebooks() {
        let mut notebook = Notebook::new();
        let summary = insert_cell(&mut notebook, CellType::Code, "x", None).unwrap();
        assert_eq!(summary.position, 0);
        assert!(notebook.cells[0].id().is_some());

        notebook.nbformat_minor = 2;
        insert_cell(&mut notebook, CellType::Markdown, "y", Some(0)).unwrap();
        assert!(notebook.cells[0].id().is_none());
    }

    #[test]
    fn update_previews_collapse_newlines() {
        let mut notebook = Notebook::with_cells(vec![Cell::code("a\nb")]);
        let summary = update_cell(&mut notebook, 0, "0123456789012345678901234567890123").unwrap();
        assert_eq!(summary.before, "a b");
        assert_eq!(summary.after, "012345678901234567890123456789...");
    }

    #[test]
    fn duplicate_drops_outputs_and_gets_new_id() {
        let mut original = Cell::code("print(1)").with_id(Some("aaaaaaaa".to_string()));
        if let Cell::Code(code) = &mut original {
            code.outputs.push(Output::stream("stdout", "1\n"));
            code.execution_count = Some(3);
        }
        let mut notebook = Notebook::with_cells(vec![original]);

        let summary = duplicate_cell(&mut notebook, 0).unwrap();
        assert_eq!(summary.new_index, 1);
        let copy = &notebook.cells[1];
        assert!(copy.outputs().is_empty());
        assert_eq!(copy.execution_count(), None);
        assert_ne!(copy.id(), Some("aaaaaaaa"));
    }

    #[test]
    fn change_type_to_same_type_is_noop() {
        let mut notebook = Notebook::with_cells(vec![Cell::markdown("# t")]);
        let before = notebook.clone();
        let summary = change_cell_type(&mut notebook, 0, CellType::Markdown).unwrap();
        assert!(!summary.changed());
        assert!(summary.to_string().contains("already this type"));
        assert_eq!(notebook, before);
    }
}
