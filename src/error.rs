//! Error types. Only header and descriptor table truncation is fatal; entry
//! problems are recorded against the entry and parsing carries on.

use thiserror::Error;

use crate::entry::EntryType;

/// Bounds violations reported by [`crate::cursor::ByteCursor`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CursorError {
    /// Fewer bytes remain than a read requires.
    #[error("needed {needed} bytes at offset {offset}, but only {remaining} remain")]
    UnexpectedEnd {
        offset: usize,
        needed: usize,
        remaining: usize,
    },
    /// Seek target lies beyond the end of the buffer.
    #[error("cannot seek to {position} in a buffer of {len} bytes")]
    SeekOutOfBounds { position: usize, len: usize },
}

/// A failure that leaves no usable document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The buffer ends inside the header or descriptor table.
    #[error("truncated AppleDouble data reading {field}: {source}")]
    Truncated {
        field: &'static str,
        #[source]
        source: CursorError,
    },
}

/// A failure confined to a single entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    /// The descriptor points outside the buffer.
    #[error("entry body {offset}+{length} lies outside a buffer of {buffer_len} bytes")]
    OutOfBounds {
        offset: u32,
        length: u32,
        buffer_len: usize,
    },
    /// The body is shorter than its fixed layout. Fixed layouts cannot
    /// otherwise fail to read.
    #[error("{kind} entry needs at least {expected} bytes, found {actual}")]
    ShortBody {
        kind: EntryType,
        expected: usize,
        actual: usize,
    },
}
