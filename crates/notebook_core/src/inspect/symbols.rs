//! Line-pattern symbol extraction for code cells.
//!
//! This is a lexical heuristic, not a parser. Each line of each code cell is
//! matched independently, so nested definitions, multi-line statements and
//! text inside strings or comments are reported exactly as the patterns see
//! them.

use crate::model::cell::CellType;
use crate::model::notebook::Notebook;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{Display, Formatter};

static IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[ \t]*((?:from[ \t]+\S+[ \t]+)?import[ \t]+\S.*)$").expect("valid import regex")
});
// Column 0 only; a single `=` so comparisons are not taken for assignments.
static ASSIGN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([^\W\d]\w*)[ \t]*=(?:[^=]|$)").expect("valid assignment regex")
});
static DEF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*def[ \t]+([^\W\d]\w*)[ \t]*\(").expect("valid def regex"));
static CLASS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[ \t]*class[ \t]+([^\W\d]\w*)[ \t]*[:(]").expect("valid class regex")
});

/// One finding: the owning cell and the captured text or name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub cell_index: usize,
    pub text: String,
}

/// Findings grouped by kind, each in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolReport {
    pub imports: Vec<Symbol>,
    pub variables: Vec<Symbol>,
    pub functions: Vec<Symbol>,
    pub classes: Vec<Symbol>,
}

impl SymbolReport {
    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
            && self.variables.is_empty()
            && self.functions.is_empty()
            && self.classes.is_empty()
    }

    fn groups(&self) -> [(&'static str, &[Symbol]); 4] {
        [
            ("Imports", self.imports.as_slice()),
            ("Variables", self.variables.as_slice()),
            ("Functions", self.functions.as_slice()),
            ("Classes", self.classes.as_slice()),
        ]
    }
}

impl Display for SymbolReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return f.write_str("No definitions found.");
        }
        let mut first = true;
        for (title, symbols) in self.groups() {
            if symbols.is_empty() {
                continue;
            }
            if !first {
                f.write_str("\n\n")?;
            }
            first = false;
            write!(f, "{title} ({}):", symbols.len())?;
            for symbol in symbols {
                write!(f, "\n  [cell {}] {}", symbol.cell_index, symbol.text)?;
            }
        }
        Ok(())
    }
}

/// Scans every line of every code cell with the four symbol patterns.
pub fn extract_symbols(notebook: &Notebook) -> SymbolReport {
    let mut report = SymbolReport::default();
    let code_cells = notebook
        .cells
        .iter()
        .enumerate()
        .filter(|(_, cell)| cell.cell_type() == CellType::Code);

    for (cell_index, cell) in code_cells {
        let symbol = |text: String| Symbol { cell_index, text };
        for line in cell.source().lines() {
            if let Some(text) = first_capture(&IMPORT_RE, line) {
                report.imports.push(symbol(text));
            }
            if !is_definition_line(line) {
                if let Some(name) =
                    first_capture(&ASSIGN_RE, line).filter(|name| !name.starts_with('_'))
                {
                    report.variables.push(symbol(name));
                }
            }
            if let Some(name) = first_capture(&DEF_RE, line) {
                report.functions.push(symbol(name));
            }
            if let Some(name) = first_capture(&CLASS_RE, line) {
                report.classes.push(symbol(name));
            }
        }
    }
    report
}

fn first_capture(re: &Regex, line: &str) -> Option<String> {
    re.captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

fn is_definition_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("def ") || trimmed.starts_with("class ")
}
