//! Storage layer error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while opening or scanning the store
#[derive(Error, Debug)]
pub enum StorageError {
    /// Path missing, locked or otherwise not openable read-only
    #[error("Store unavailable at {path:?}: {reason}")]
    StoreUnavailable { path: PathBuf, reason: String },

    /// I/O fault while iterating a range
    #[error("Scan error: {0}")]
    Scan(String),

    /// Scan attempted before a successful refresh
    #[error("Store is not open")]
    NotOpen,
}
