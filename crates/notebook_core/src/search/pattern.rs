//! Search pattern compilation.

use regex::{Regex, RegexBuilder};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Options that control how a search pattern is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternOptions {
    /// Treat the pattern as a regular expression instead of literal text.
    pub use_regex: bool,
    pub case_sensitive: bool,
}

impl Default for PatternOptions {
    fn default() -> Self {
        Self {
            use_regex: false,
            case_sensitive: true,
        }
    }
}

/// Pattern that cannot be used for searching: a malformed regex, or an
/// empty pattern. Empty patterns would match between every character, so
/// they are refused in both literal and regex mode.
///
/// Reported back to callers as a result, never raised as a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternError {
    pub pattern: String,
    pub message: String,
}

impl Display for PatternError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid pattern `{}`: {}", self.pattern, self.message)
    }
}

impl Error for PatternError {}

/// Compiles `pattern`, escaping it first unless `options.use_regex` is set.
pub fn compile_pattern(pattern: &str, options: PatternOptions) -> Result<Regex, PatternError> {
    if pattern.is_empty() {
        return Err(PatternError {
            pattern: String::new(),
            message: "pattern must not be empty".to_string(),
        });
    }

    let source = if options.use_regex {
        pattern.to_string()
    } else {
        regex::escape(pattern)
    };

    RegexBuilder::new(&source)
        .case_insensitive(!options.case_sensitive)
        .build()
        .map_err(|err| PatternError {
            pattern: pattern.to_string(),
            message: err.to_string(),
        })
}
