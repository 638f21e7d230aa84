//! Notebook use-case service.
//!
//! # Responsibility
//! - Run every public operation as load, validate, apply, save, report.
//! - Delegate persistence to a `NotebookStore` implementation.
//!
//! # Invariants
//! - Every call reloads the document; nothing is cached between calls.
//! - Rejected input never reaches `save`.
//! - Read-only operations and no-op outcomes never save.
//! - Replace saves at most once per call, after all cells are processed.

use crate::edit::bounds::IndexOutOfRange;
use crate::edit::metadata::{self, MetadataSummary};
use crate::edit::ops::{
    self, ChangeTypeSummary, DeleteSummary, DuplicateSummary, InsertSummary, MoveSummary,
    UpdateSummary,
};
use crate::inspect::context::{self, ContextBundle};
use crate::inspect::render::{self, CellDetail, CellOutputs, NotebookOverview};
use crate::inspect::symbols::{self, SymbolReport};
use crate::model::cell::CellType;
use crate::model::notebook::Notebook;
use crate::search::{self, PatternOptions, ReplaceReport, SearchReport};
use crate::store::{NotebookStore, StoreError};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type NotebookResult<T> = Result<T, NotebookError>;

/// Service error for notebook use-cases.
#[derive(Debug)]
pub enum NotebookError {
    /// Cell index or insertion slot outside the current bounds.
    Index(IndexOutOfRange),
    /// Store-layer failure, passed through unchanged.
    Store(StoreError),
}

impl Display for NotebookError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Index(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NotebookError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Index(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<IndexOutOfRange> for NotebookError {
    fn from(value: IndexOutOfRange) -> Self {
        Self::Index(value)
    }
}

impl From<StoreError> for NotebookError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Use-case service over a notebook store.
pub struct NotebookService<S: NotebookStore> {
    store: S,
}

impl<S: NotebookStore> NotebookService<S> {
    /// Creates a service using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Summarizes cell count, kernel and a one-line preview per cell.
    pub fn read_notebook(&self, path: &str) -> NotebookResult<NotebookOverview> {
        self.inspect("read_notebook", path, |notebook| {
            Ok(render::overview(notebook, render::document_name(path)))
        })
    }

    pub fn read_cell(&self, path: &str, index: i64) -> NotebookResult<CellDetail> {
        self.inspect("read_cell", path, |notebook| {
            render::cell_detail(notebook, index)
        })
    }

    pub fn read_cell_output(&self, path: &str, index: i64) -> NotebookResult<CellOutputs> {
        self.inspect("read_cell_output", path, |notebook| {
            render::cell_outputs(notebook, index)
        })
    }

    /// Inserts a new cell; `position = None` appends.
    pub fn insert_cell(
        &self,
        path: &str,
        cell_type: CellType,
        source: &str,
        position: Option<i64>,
    ) -> NotebookResult<InsertSummary> {
        self.mutate("insert_cell", path, |notebook| {
            let summary = ops::insert_cell(notebook, cell_type, source, position)?;
            Ok((summary, true))
        })
    }

    pub fn update_cell(
        &self,
        path: &str,
        index: i64,
        new_source: &str,
    ) -> NotebookResult<UpdateSummary> {
        self.mutate("update_cell", path, |notebook| {
            Ok((ops::update_cell(notebook, index, new_source)?, true))
        })
    }

    pub fn delete_cell(&self, path: &str, index: i64) -> NotebookResult<DeleteSummary> {
        self.mutate("delete_cell", path, |notebook| {
            Ok((ops::delete_cell(notebook, index)?, true))
        })
    }

    /// Moves a cell with remove-then-insert semantics.
    pub fn move_cell(&self, path: &str, from: i64, to: i64) -> NotebookResult<MoveSummary> {
        self.mutate("move_cell", path, |notebook| {
            Ok((ops::move_cell(notebook, from, to)?, true))
        })
    }

    pub fn duplicate_cell(&self, path: &str, index: i64) -> NotebookResult<DuplicateSummary> {
        self.mutate("duplicate_cell", path, |notebook| {
            Ok((ops::duplicate_cell(notebook, index)?, true))
        })
    }

    /// Retypes a cell; requesting the current type is a reported no-op.
    pub fn change_cell_type(
        &self,
        path: &str,
        index: i64,
        cell_type: CellType,
    ) -> NotebookResult<ChangeTypeSummary> {
        self.mutate("change_cell_type", path, |notebook| {
            let summary = ops::change_cell_type(notebook, index, cell_type)?;
            let changed = summary.changed();
            Ok((summary, changed))
        })
    }

    pub fn set_notebook_metadata(
        &self,
        path: &str,
        key: &str,
        raw_value: &str,
    ) -> NotebookResult<MetadataSummary> {
        self.mutate("set_notebook_metadata", path, |notebook| {
            Ok((metadata::set_notebook_metadata(notebook, key, raw_value), true))
        })
    }

    pub fn set_cell_metadata(
        &self,
        path: &str,
        index: i64,
        key: &str,
        raw_value: &str,
    ) -> NotebookResult<MetadataSummary> {
        self.mutate("set_cell_metadata", path, |notebook| {
            Ok((
                metadata::set_cell_metadata(notebook, index, key, raw_value)?,
                true,
            ))
        })
    }

    /// Searches every cell; a bad pattern comes back as a report variant.
    pub fn search(
        &self,
        path: &str,
        pattern: &str,
        options: PatternOptions,
    ) -> NotebookResult<SearchReport> {
        self.inspect("search", path, |notebook| {
            let report = search::search_notebook(notebook, pattern, options);
            log_pattern_outcome("search", path, &report);
            Ok(report)
        })
    }

    /// Replaces every match; saves once unless previewing or nothing matched.
    pub fn replace(
        &self,
        path: &str,
        pattern: &str,
        replacement: &str,
        options: PatternOptions,
        preview_only: bool,
    ) -> NotebookResult<ReplaceReport> {
        self.mutate("replace", path, |notebook| {
            let report =
                search::replace_in_notebook(notebook, pattern, replacement, options, preview_only);
            if let ReplaceReport::InvalidPattern(err) = &report {
                warn!(
                    "event=pattern_rejected module=service op=replace path={} error={}",
                    path, err
                );
            }
            let applied = report.is_applied();
            Ok((report, applied))
        })
    }

    /// Builds the context window around `index`.
    pub fn cell_context(
        &self,
        path: &str,
        index: i64,
        radius: usize,
    ) -> NotebookResult<ContextBundle> {
        self.inspect("cell_context", path, |notebook| {
            context::cell_context(notebook, render::document_name(path), index, radius)
        })
    }

    pub fn extract_symbols(&self, path: &str) -> NotebookResult<SymbolReport> {
        self.inspect("extract_symbols", path, |notebook| {
            Ok(symbols::extract_symbols(notebook))
        })
    }

    fn load(&self, op: &'static str, path: &str) -> NotebookResult<Notebook> {
        self.store.load(path).map_err(|err| {
            warn!(
                "event=notebook_op module=service status=error op={} path={} error_code=load_failed error={}",
                op, path, err
            );
            NotebookError::from(err)
        })
    }

    fn inspect<T>(
        &self,
        op: &'static str,
        path: &str,
        f: impl FnOnce(&Notebook) -> Result<T, IndexOutOfRange>,
    ) -> NotebookResult<T> {
        let started_at = Instant::now();
        let notebook = self.load(op, path)?;
        let outcome = f(&notebook).map_err(|err| reject(op, path, err))?;
        info!(
            "event=notebook_op module=service status=ok op={} path={} saved=false duration_ms={}",
            op,
            path,
            started_at.elapsed().as_millis()
        );
        Ok(outcome)
    }

    /// Applies `f`; saves only when it reports a change.
    fn mutate<T>(
        &self,
        op: &'static str,
        path: &str,
        f: impl FnOnce(&mut Notebook) -> Result<(T, bool), IndexOutOfRange>,
    ) -> NotebookResult<T> {
        let started_at = Instant::now();
        let mut notebook = self.load(op, path)?;
        let (outcome, changed) = f(&mut notebook).map_err(|err| reject(op, path, err))?;

        if changed {
            self.store.save(&notebook, path).map_err(|err| {
                warn!(
                    "event=notebook_op module=service status=error op={} path={} error_code=save_failed error={}",
                    op, path, err
                );
                NotebookError::from(err)
            })?;
        }

        info!(
            "event=notebook_op module=service status=ok op={} path={} saved={} cells={} duration_ms={}",
            op,
            path,
            changed,
            notebook.len(),
            started_at.elapsed().as_millis()
        );
        Ok(outcome)
    }
}

fn reject(op: &'static str, path: &str, err: IndexOutOfRange) -> NotebookError {
    warn!(
        "event=notebook_op module=service status=rejected op={} path={} error_code=index_out_of_range error={}",
        op, path, err
    );
    NotebookError::Index(err)
}

fn log_pattern_outcome(op: &'static str, path: &str, report: &SearchReport) {
    match report {
        SearchReport::InvalidPattern(err) => warn!(
            "event=pattern_rejected module=service op={} path={} error={}",
            op, path, err
        ),
        other => debug!(
            "event=pattern_matched module=service op={} path={} matches={}",
            op,
            path,
            other.total_matches()
        ),
    }
}
