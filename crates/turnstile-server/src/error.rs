//! Server error types.

use thiserror::Error;
use turnstile_core::StoreError;

/// Errors that can occur in the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Transport/network error.
    #[error("transport error: {0}")]
    Io(#[from] std::io::Error),

    /// The peer sent nothing within the read timeout.
    #[error("read timed out")]
    ReadTimeout,

    /// The expectation store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
