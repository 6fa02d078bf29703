//! Internal error types for Gemini operations.
//!
//! These errors are internal to `psyrang-gemini` and are mapped to the core
//! `UpstreamError` at the port boundary.

use psyrang_core::UpstreamError;
use thiserror::Error;

/// Result type alias for Gemini operations.
pub type GeminiResult<T> = Result<T, GeminiError>;

/// Errors related to Gemini API operations.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// API request failed with an HTTP error status.
    #[error("Gemini API request failed with status {status}")]
    ApiRequestFailed {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Network or HTTP client error.
    #[error("Network error: {0}")]
    Network(String),

    /// HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    /// Endpoint URL parsing error.
    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON encoding or decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<GeminiError> for UpstreamError {
    fn from(err: GeminiError) -> Self {
        match err {
            GeminiError::ApiRequestFailed { status, body } => Self::Status { status, body },
            GeminiError::Json(e) => Self::Decode(e.to_string()),
            other @ (GeminiError::Network(_)
            | GeminiError::ClientBuild(_)
            | GeminiError::InvalidUrl(_)) => Self::Transport(other.to_string()),
        }
    }
}
