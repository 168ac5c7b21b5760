//! Output formatting error types
//!
//! These never reach the user: a body that cannot be reformatted is written
//! as-is. They exist so the fallback path can say why it was taken.

use thiserror::Error;

/// Errors from reformatting a chunk for display
#[derive(Debug, Error)]
pub enum ParseFormatError {
    /// Chunk is not a single JSON document
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Chunk is empty or whitespace
    #[error("empty input")]
    Empty,

    /// Re-serialization failed
    #[error("serialization error: {0}")]
    Serialize(String),
}

impl ParseFormatError {
    /// Create a serialization error
    pub fn serialize(msg: impl Into<String>) -> Self {
        ParseFormatError::Serialize(msg.into())
    }
}

/// Result type for formatting operations
pub type FormatResult<T> = Result<T, ParseFormatError>;
