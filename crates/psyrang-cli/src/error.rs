//! CLI-specific error types and mappings.
//!
//! Library errors are folded into a few categories, each with its own exit
//! code and user-facing message.

use psyrang_cache::CacheError;
use psyrang_gemini::GeminiError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Argument could not be used.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Remote service could not be reached or refused the request.
    #[error("Network error: {0}")]
    Network(String),

    /// Cache lifecycle error.
    #[error("{0}")]
    Cache(String),

    /// The proxy server failed to start or stopped with an error.
    #[error("Server error: {0}")]
    Server(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 0: Success
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Specific error categories (see sysexits.h)
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Cache(_) => 1,
            Self::Arguments(_) => 2, // EX_USAGE
            Self::Network(_) => 69,  // EX_UNAVAILABLE
            Self::Server(_) => 71,   // EX_OSERR
            Self::Io(_) => 74,       // EX_IOERR
            Self::Config(_) => 78,   // EX_CONFIG
        }
    }
}

impl From<CacheError> for CliError {
    fn from(err: CacheError) -> Self {
        let message = err.to_string();
        match err {
            CacheError::Network { .. } | CacheError::BadStatus { .. } | CacheError::Populate { .. } => {
                Self::Network(message)
            }
            CacheError::Storage { .. } | CacheError::Corrupt(_) => Self::Io(message),
            CacheError::InvalidUrl { .. } => Self::Arguments(message),
            CacheError::InvalidName(_) | CacheError::Manifest(_) => Self::Config(message),
            CacheError::NotInstalled { .. } => Self::Cache(message),
        }
    }
}

impl From<GeminiError> for CliError {
    fn from(err: GeminiError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
