//! Client error types.

use thiserror::Error;
use turnstile_core::StoreError;

/// Errors from one authentication attempt.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The password sequence is empty. Detected before any network I/O;
    /// recovery requires regenerating a sequence on both sides.
    #[error("all passwords have been exhausted, generate a new list of passwords")]
    Exhausted,

    /// The sequence store failed to load or rewrite.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Connection refused, reset, or timed out. The submitted token was
    /// still consumed.
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),
}
