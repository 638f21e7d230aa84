//! Pattern search across every cell of a notebook.
//!
//! # Invariants
//! - Cells are scanned in document order; matches within a cell are the
//!   non-overlapping leftmost-first matches of the compiled pattern.
//! - Context windows are measured in characters and clipped to the cell text.

use super::pattern::{compile_pattern, PatternError, PatternOptions};
use crate::model::cell::CellType;
use crate::model::notebook::Notebook;
use crate::text::mark_newlines;
use regex::{Match, Regex};
use std::fmt::{Display, Formatter};

/// Characters of context kept on each side of a match.
pub const CONTEXT_CHARS: usize = 20;

/// One match inside a cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchHit {
    /// Match plus surrounding context, newlines shown as `↵`.
    pub context: String,
    /// Exact matched text.
    pub matched: String,
}

/// All matches found in one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellMatches {
    pub index: usize,
    pub cell_type: CellType,
    pub hits: Vec<MatchHit>,
}

/// Outcome of [`search_notebook`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchReport {
    Matches {
        pattern: String,
        cells: Vec<CellMatches>,
    },
    NoMatches {
        pattern: String,
    },
    InvalidPattern(PatternError),
}

impl SearchReport {
    /// Total number of matches across all cells.
    pub fn total_matches(&self) -> usize {
        match self {
            Self::Matches { cells, .. } => cells.iter().map(|cell| cell.hits.len()).sum(),
            Self::NoMatches { .. } | Self::InvalidPattern(_) => 0,
        }
    }
}

impl Display for SearchReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPattern(err) => write!(f, "Search failed: {err}"),
            Self::NoMatches { pattern } => write!(f, "No matches for `{pattern}`."),
            Self::Matches { pattern, cells } => {
                write!(
                    f,
                    "Found {} match(es) in {} cell(s) for `{}`",
                    self.total_matches(),
                    cells.len(),
                    pattern
                )?;
                for cell in cells {
                    write!(f, "\n\n[{}] {} ({} match(es))", cell.index, cell.cell_type, cell.hits.len())?;
                    for hit in &cell.hits {
                        write!(f, "\n  ...{}...\n    match: {}", hit.context, hit.matched)?;
                    }
                }
                Ok(())
            }
        }
    }
}

/// Searches every cell source for `pattern`.
pub fn search_notebook(notebook: &Notebook, pattern: &str, options: PatternOptions) -> SearchReport {
    let re = match compile_pattern(pattern, options) {
        Ok(re) => re,
        Err(err) => return SearchReport::InvalidPattern(err),
    };

    let cells = notebook
        .cells
        .iter()
        .enumerate()
        .filter_map(|(index, cell)| {
            let hits = find_hits(&re, cell.source());
            (!hits.is_empty()).then(|| CellMatches {
                index,
                cell_type: cell.cell_type(),
                hits,
            })
        })
        .collect::<Vec<_>>();

    if cells.is_empty() {
        SearchReport::NoMatches {
            pattern: pattern.to_string(),
        }
    } else {
        SearchReport::Matches {
            pattern: pattern.to_string(),
            cells,
        }
    }
}

fn find_hits(re: &Regex, text: &str) -> Vec<MatchHit> {
    re.find_iter(text)
        .map(|m| MatchHit {
            context: mark_newlines(&context_window(text, m)),
            matched: m.as_str().to_string(),
        })
        .collect()
}

fn context_window(text: &str, m: Match<'_>) -> String {
    let prefix = &text[..m.start()];
    let skip = prefix.chars().count().saturating_sub(CONTEXT_CHARS);
    let before: String = prefix.chars().skip(skip).collect();
    let after: String = text[m.end()..].chars().take(CONTEXT_CHARS).collect();
    format!("{before}{}{after}", m.as_str())
}

#[cfg(test)]
mod tests {
    use super::{search_notebook, SearchReport};
    use crate::model::cell::Cell;
    use crate::model::notebook::Notebook;
    use crate::search::pattern::PatternOptions;

    #[test]
    fn context_is_clipped_to_twenty_chars_each_side() {
        let source = format!("{}needle{}", "a".repeat(30), "b".repeat(30));
        let notebook = Notebook::with_cells(vec![Cell::code(source)]);
        let report = search_notebook(&notebook, "needle", PatternOptions::default());
        let SearchReport::Matches { cells, .. } = report else {
            panic!("expected matches");
        };
        let hit = &cells[0].hits[0];
        assert_eq!(hit.matched, "needle");
        assert_eq!(
            hit.context,
            format!("{}needle{}", "a".repeat(20), "b".repeat(20))
        );
    }

    #[test]
    fn context_marks_newlines_and_stays_inside_cell() {
        let notebook = Notebook::with_cells(vec![Cell::markdown("x\nkey\ny")]);
        let report = search_notebook(&notebook, "key", PatternOptions::default());
        let SearchReport::Matches { cells, .. } = report else {
            panic!("expected matches");
        };
        assert_eq!(cells[0].hits[0].context, "x↵key↵y");
    }

    #[test]
    fn reports_no_matches_and_invalid_patterns() {
        let notebook = Notebook::with_cells(vec![Cell::code("abc")]);
        let none = search_notebook(&notebook, "zzz", PatternOptions::default());
        assert!(matches!(none, SearchReport::NoMatches { .. }));
        assert!(none.to_string().contains("No matches"));

        let options = PatternOptions {
            use_regex: true,
            ..PatternOptions::default()
        };
        let invalid = search_notebook(&notebook, "[", options);
        assert!(matches!(invalid, SearchReport::InvalidPattern(_)));
    }
}
