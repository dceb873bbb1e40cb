//! Core error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from chain generation.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The requested password count is not a positive integer.
    #[error("password count must be a positive integer, got {count}")]
    InvalidCount {
        /// The rejected count.
        count: usize,
    },
}

/// Errors from reading or writing a persisted store.
///
/// All variants are fatal to the current operation; nothing here is retried.
/// Writes go through a temp file and rename, so a failed write never leaves a
/// partially rewritten store behind.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store file could not be read.
    #[error("failed to read store {}: {source}", path.display())]
    Read {
        /// Path of the store file.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The store file could not be written.
    #[error("failed to write store {}: {source}", path.display())]
    Write {
        /// Path of the store file.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The store file exists but its contents are unusable.
    #[error("store {} is malformed: {reason}", path.display())]
    Malformed {
        /// Path of the store file.
        path: PathBuf,
        /// Description of what failed to parse.
        reason: String,
    },
}
