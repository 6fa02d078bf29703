//! Proxy error taxonomy.
//!
//! Every failure of the pipeline is terminal for the current invocation.
//! Each variant carries the HTTP status it should surface as; adapters do
//! the actual response mapping.

use thiserror::Error;

use crate::ports::UpstreamError;

/// Message returned when the upstream credential is missing.
pub const MISSING_API_KEY_MESSAGE: &str = "API key not configured.";

/// Message returned when the upstream produced no usable candidate.
pub const INVALID_UPSTREAM_MESSAGE: &str = "Invalid response from AI service.";

/// Message returned when breakdown output could not be decoded.
pub const UNEXPECTED_FORMAT_MESSAGE: &str = "AI returned a response in an unexpected format.";

/// Errors produced by `ProxyService::handle`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProxyError {
    /// Inbound method other than POST.
    #[error("Method Not Allowed")]
    MethodNotAllowed {
        /// The rejected method.
        method: String,
    },

    /// Upstream credential is not configured.
    #[error("{}", MISSING_API_KEY_MESSAGE)]
    MissingApiKey,

    /// Request body could not be decoded or violates the request invariants.
    #[error("{0}")]
    InvalidPayload(String),

    /// Upstream answered with a failure status; passed through verbatim.
    #[error("Error from Google AI API: {body}")]
    Upstream {
        /// Upstream status code.
        status: u16,
        /// Raw upstream error body.
        body: String,
    },

    /// Upstream succeeded but carried no candidate text.
    #[error("{}", INVALID_UPSTREAM_MESSAGE)]
    InvalidUpstreamResponse,

    /// Breakdown text did not decode into the expected structure.
    #[error("{}", UNEXPECTED_FORMAT_MESSAGE)]
    UnexpectedFormat,

    /// Anything else; the message is echoed to the caller.
    #[error("{0}")]
    Internal(String),
}

/// Error class, for logging and for adapters that do not speak HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Malformed method or payload.
    Client,
    /// Missing upstream credential.
    Configuration,
    /// Upstream failure status.
    UpstreamStatus,
    /// Upstream succeeded with unusable content.
    UpstreamShape,
    /// Unexpected failure.
    Internal,
}

impl ProxyError {
    /// HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::MethodNotAllowed { .. } => 405,
            Self::InvalidPayload(_) => 400,
            Self::Upstream { status, .. } => *status,
            Self::MissingApiKey
            | Self::InvalidUpstreamResponse
            | Self::UnexpectedFormat
            | Self::Internal(_) => 500,
        }
    }

    /// Taxonomy class of this error.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::MethodNotAllowed { .. } | Self::InvalidPayload(_) => ErrorClass::Client,
            Self::MissingApiKey => ErrorClass::Configuration,
            Self::Upstream { .. } => ErrorClass::UpstreamStatus,
            Self::InvalidUpstreamResponse | Self::UnexpectedFormat => ErrorClass::UpstreamShape,
            Self::Internal(_) => ErrorClass::Internal,
        }
    }

    /// True when the message is the bare response body instead of a JSON
    /// error envelope: the method and credential guards, and upstream
    /// failures carrying the upstream's raw text.
    #[must_use]
    pub const fn is_plain_text(&self) -> bool {
        matches!(
            self,
            Self::MethodNotAllowed { .. } | Self::MissingApiKey | Self::Upstream { .. }
        )
    }
}

impl From<UpstreamError> for ProxyError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Status { status, body } => Self::Upstream { status, body },
            UpstreamError::Transport(msg) | UpstreamError::Decode(msg) => Self::Internal(msg),
        }
    }
}
