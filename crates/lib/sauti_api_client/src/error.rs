//! API error types.

use sauti_core::storage::StorageError;
use thiserror::Error;

/// Errors surfaced by the remote API boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a usable response (connect, timeout,
    /// decode).
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Reading the bearer token from storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
