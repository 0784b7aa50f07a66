//! Huginn error types

use std::time::Duration;

use crate::types::RunState;

/// Huginn error types
#[derive(Debug, thiserror::Error)]
pub enum HuginnError {
    // Run outcomes surfaced to the user
    #[error("no video reference supplied")]
    MissingInput,

    #[error("failed to fetch comments: {0}")]
    FetchFailed(String),

    #[error("no comments found")]
    NoComments,

    // Provider/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("model not found: {0}")]
    ModelNotFound(String),

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("data error: {0}")]
    DataError(String),

    #[error("empty response from model")]
    EmptyResponse,

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl HuginnError {
    /// The message shown to the user when a run ends with this error.
    ///
    /// A fetch failure's cause is logged, not shown.
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingInput => "Please enter a YouTube link.".to_string(),
            Self::FetchFailed(_) => "Failed to fetch comments.".to_string(),
            Self::NoComments => "No comments found.".to_string(),
            other => format!("Analysis failed: {other}"),
        }
    }

    /// The terminal state a run reaches when it ends with this error.
    pub fn terminal_state(&self) -> RunState {
        match self {
            Self::NoComments => RunState::Empty,
            _ => RunState::Failed,
        }
    }
}

/// Result type alias for Huginn operations
pub type Result<T> = std::result::Result<T, HuginnError>;
