//! Snapshot errors.
//!
//! Only IO failures abort a dump or load. A record that fails to parse or
//! resolve is an [`SnapshotError::InvalidRecord`]; the loader logs it,
//! drops the record and continues with the rest of the file.

use std::io;
use thiserror::Error;

/// Result type alias for snapshot operations.
pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Errors raised by the snapshot engine.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Could not open the snapshot file.
    #[error("failed to open snapshot {path}: {source}")]
    Io {
        /// Path that failed to open.
        path: String,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },

    /// A read or write on an open snapshot failed.
    #[error("snapshot IO failed: {0}")]
    Stream(#[from] io::Error),

    /// One record could not be parsed or resolved against the current
    /// metadata model. Record-scoped: never aborts a load.
    #[error("line {line}: {detail}")]
    InvalidRecord { line: usize, detail: String },
}
