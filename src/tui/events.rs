//! Results of background work, delivered back to the event loop

use std::path::PathBuf;

use crate::models::{LoginResponse, SendSmsBatchResponse, SendSmsResponse};

/// Application events produced by spawned tasks
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Login request finished
    LoginFinished(Result<LoginResponse, String>),
    /// Single SMS request finished
    SmsSent {
        to: String,
        result: Result<SendSmsResponse, String>,
    },
    /// Batch upload finished
    BatchSent(Result<SendSmsBatchResponse, String>),
    /// Log export finished
    ExportFinished(Result<(PathBuf, usize), String>),
}
