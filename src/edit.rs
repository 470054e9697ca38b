//! The edit record and the ledger entry it becomes once applied.

use std::path::PathBuf;

/// One byte-range replacement in a source file, expressed in the
/// coordinates of the file as it was when the producing diagnostic was
/// emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    /// File identifier (absolute or workspace-relative).
    pub path: PathBuf,
    /// Zero-based byte offset in the *original* file.
    pub offset: usize,
    /// Number of bytes replaced; `0` is a pure insertion.
    pub length: usize,
    /// Replacement bytes; empty is a pure deletion.
    pub text: String,
}

/// One appended delta in a `PatchedFile`'s edit ledger.
///
/// Ledger entries are kept in append order, not sorted; offset
/// translation sums `delta` of every entry whose `anchor` is strictly
/// less than the query offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerEntry {
    /// Offset in the *original* file at which the edit was applied.
    pub anchor: usize,
    /// `text.len() as isize - length as isize`.
    pub delta: isize,
}
