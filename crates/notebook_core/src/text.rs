//! Preview and truncation helpers shared by reports.
//!
//! All lengths are counted in characters, never bytes, so multi-byte text is
//! never split inside a code point.

/// Glyph that stands in for a newline in single-line renderings.
pub const NEWLINE_MARKER: &str = "↵";

const ELLIPSIS: &str = "...";

/// First `max_chars` characters with newlines replaced by `newline`, plus
/// `...` when the text was longer.
pub fn preview(text: &str, max_chars: usize, newline: &str) -> String {
    let head: String = text.chars().take(max_chars).collect();
    let mut rendered = head.replace('\n', newline);
    if text.chars().count() > max_chars {
        rendered.push_str(ELLIPSIS);
    }
    rendered
}

/// Truncates to `max_chars` characters, appending `...` when cut.
pub fn truncate(text: &str, max_chars: usize) -> String {
    let mut truncated: String = text.chars().take(max_chars).collect();
    if text.chars().count() > max_chars {
        truncated.push_str(ELLIPSIS);
    }
    truncated
}

/// Replaces every newline with [`NEWLINE_MARKER`].
pub fn mark_newlines(text: &str) -> String {
    text.replace('\n', NEWLINE_MARKER)
}
