//! Authentication error types

use thiserror::Error;

use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum AuthError {
    /// The endpoint answered with a non-success status
    #[error("{0}")]
    Rejected(String),

    #[error("Unexpected auth response: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
