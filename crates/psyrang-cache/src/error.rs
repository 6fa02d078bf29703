//! Error types for the offline asset cache.

use thiserror::Error;

/// Result type alias for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Errors that can occur while installing, activating, or serving assets.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The network request itself failed.
    #[error("Network error fetching {url}: {message}")]
    Network {
        /// Requested URL.
        url: String,
        /// Underlying error message.
        message: String,
    },

    /// The network answered with a non-success status.
    #[error("Request for {url} failed with status {status}")]
    BadStatus {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// One asset could not be fetched, so the whole population failed.
    #[error("Failed to cache {url}: {reason}")]
    Populate {
        /// Asset that failed.
        url: String,
        /// Why it failed.
        reason: String,
    },

    /// I/O failure in the backing store.
    #[error("Storage error ({kind}): {message}")]
    Storage {
        /// The kind of I/O error (e.g., "not found", "permission denied").
        kind: String,
        /// Detailed error message.
        message: String,
    },

    /// A stored entry could not be decoded.
    #[error("Corrupt cache entry: {0}")]
    Corrupt(String),

    /// Store name is not usable.
    #[error("Invalid cache name: {0:?}")]
    InvalidName(String),

    /// Asset URL could not be resolved.
    #[error("Invalid asset URL {url}: {message}")]
    InvalidUrl {
        /// URL as given.
        url: String,
        /// Parser message.
        message: String,
    },

    /// Activation was requested before a successful install.
    #[error("Cache {name} has not been installed")]
    NotInstalled {
        /// Store name that is missing.
        name: String,
    },

    /// The manifest is unusable.
    #[error("Invalid manifest: {0}")]
    Manifest(String),
}

impl From<std::io::Error> for CacheError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage {
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}
