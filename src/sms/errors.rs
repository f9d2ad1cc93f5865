//! SMS API error types

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SmsError {
    /// The API answered with a non-success status
    #[error("{message}")]
    RequestFailed { status: u16, message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
