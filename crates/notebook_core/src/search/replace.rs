//! Pattern substitution across notebook cells.
//!
//! # Invariants
//! - Preview mode never mutates the notebook.
//! - Only cells with at least one match are touched or reported.
//! - `total` always equals the sum of per-cell counts.

use super::pattern::{compile_pattern, PatternError, PatternOptions};
use crate::model::cell::CellType;
use crate::model::notebook::Notebook;
use crate::text::{preview, NEWLINE_MARKER};
use regex::{NoExpand, Regex};
use std::borrow::Cow;
use std::fmt::{Display, Formatter};

const PREVIEW_CHARS: usize = 50;

/// Per-cell substitution result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellReplacement {
    pub index: usize,
    pub cell_type: CellType,
    pub count: usize,
    pub before: String,
    pub after: String,
}

/// Outcome of [`replace_in_notebook`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplaceReport {
    Replaced {
        pattern: String,
        cells: Vec<CellReplacement>,
        total: usize,
        /// `true` when nothing was written back.
        preview_only: bool,
    },
    NoMatches {
        pattern: String,
    },
    InvalidPattern(PatternError),
}

impl ReplaceReport {
    /// Whether the notebook was changed and needs saving.
    pub fn is_applied(&self) -> bool {
        matches!(
            self,
            Self::Replaced {
                preview_only: false,
                ..
            }
        )
    }
}

impl Display for ReplaceReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPattern(err) => write!(f, "Replace failed: {err}"),
            Self::NoMatches { pattern } => write!(f, "No matches for `{pattern}`; nothing replaced."),
            Self::Replaced {
                pattern,
                cells,
                total,
                preview_only,
            } => {
                let heading = if *preview_only {
                    "Replace preview (not saved)"
                } else {
                    "Replaced"
                };
                write!(
                    f,
                    "{heading}: {total} match(es) of `{pattern}` in {} cell(s)",
                    cells.len()
                )?;
                for cell in cells {
                    write!(
                        f,
                        "\n\n[{}] {} ({} match(es))\n  before: {}\n  after: {}",
                        cell.index, cell.cell_type, cell.count, cell.before, cell.after
                    )?;
                }
                Ok(())
            }
        }
    }
}

/// Substitutes every match of `pattern` with `replacement`.
///
/// In regex mode `replacement` may reference capture groups (`$1`,
/// `${name}`); in literal mode it is inserted verbatim. With `preview_only`
/// the notebook is left untouched.
pub fn replace_in_notebook(
    notebook: &mut Notebook,
    pattern: &str,
    replacement: &str,
    options: PatternOptions,
    preview_only: bool,
) -> ReplaceReport {
    let re = match compile_pattern(pattern, options) {
        Ok(re) => re,
        Err(err) => return ReplaceReport::InvalidPattern(err),
    };

    let mut cells = Vec::new();
    for (index, cell) in notebook.cells.iter_mut().enumerate() {
        let count = re.find_iter(cell.source()).count();
        if count == 0 {
            continue;
        }

        let replaced = substitute(&re, cell.source(), replacement, options.use_regex).into_owned();
        cells.push(CellReplacement {
            index,
            cell_type: cell.cell_type(),
            count,
            before: preview(cell.source(), PREVIEW_CHARS, NEWLINE_MARKER),
            after: preview(&replaced, PREVIEW_CHARS, NEWLINE_MARKER),
        });
        if !preview_only {
            cell.set_source(replaced);
        }
    }

    if cells.is_empty() {
        return ReplaceReport::NoMatches {
            pattern: pattern.to_string(),
        };
    }

    let total = cells.iter().map(|cell| cell.count).sum();
    ReplaceReport::Replaced {
        pattern: pattern.to_string(),
        cells,
        total,
        preview_only,
    }
}

fn substitute<'t>(re: &Regex, text: &'t str, replacement: &str, expand: bool) -> Cow<'t, str> {
    if expand {
        re.replace_all(text, replacement)
    } else {
        re.replace_all(text, NoExpand(replacement))
    }
}
