//! Index validation for cell addressing.
//!
//! Indices arrive signed so that negative caller input is reported as out of
//! range instead of wrapping or being rejected by the type system upstream.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// What an index was meant to address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    /// An existing cell, valid range `0..len`.
    Cell,
    /// An insertion slot, valid range `0..=len`.
    InsertPosition,
}

/// Index outside the valid range for the current document length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexOutOfRange {
    pub index: i64,
    pub len: usize,
    pub kind: IndexKind,
}

impl Display for IndexOutOfRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            IndexKind::Cell if self.len == 0 => write!(
                f,
                "cell index {} is out of range: notebook has no cells",
                self.index
            ),
            IndexKind::Cell => write!(
                f,
                "cell index {} is out of range; valid range: 0 ~ {}",
                self.index,
                self.len - 1
            ),
            IndexKind::InsertPosition => write!(
                f,
                "insert position {} is out of range; valid range: 0 ~ {}",
                self.index, self.len
            ),
        }
    }
}

impl Error for IndexOutOfRange {}

/// Validates `index` against an existing cell of a `len`-cell document.
pub fn validate_cell_index(len: usize, index: i64) -> Result<usize, IndexOutOfRange> {
    match usize::try_from(index) {
        Ok(resolved) if resolved < len => Ok(resolved),
        _ => Err(IndexOutOfRange {
            index,
            len,
            kind: IndexKind::Cell,
        }),
    }
}

/// Validates an insertion slot; `None` resolves to `len` (append).
pub fn validate_insert_position(
    len: usize,
    position: Option<i64>,
) -> Result<usize, IndexOutOfRange> {
    let Some(position) = position else {
        return Ok(len);
    };
    match usize::try_from(position) {
        Ok(resolved) if resolved <= len => Ok(resolved),
        _ => Err(IndexOutOfRange {
            index: position,
            len,
            kind: IndexKind::InsertPosition,
        }),
    }
}
