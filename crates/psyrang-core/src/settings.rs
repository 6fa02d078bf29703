//! Proxy configuration.
//!
//! The upstream credential is read once, at construction time, and injected
//! into the proxy. Nothing in the request path reads the process
//! environment.

use std::fmt;

use crate::decode::ShapeCheck;

/// Environment variable holding the upstream credential.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Environment variable overriding the upstream endpoint URL.
pub const ENDPOINT_ENV: &str = "PSYRANG_GEMINI_ENDPOINT";

/// Environment variable for the HTTP listen port.
pub const PORT_ENV: &str = "PSYRANG_PORT";

/// Default HTTP listen port (matches the local functions dev server).
pub const DEFAULT_PROXY_PORT: u16 = 8888;

/// Upstream credential.
///
/// `Debug` and `Display` are redacted so the key never ends up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a key. Returns `None` for an empty or whitespace-only value.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Raw key, for building the upstream query string only.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// Configuration for the proxy pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Upstream credential; `None` makes every request fail with 500.
    pub api_key: Option<ApiKey>,
    /// Post-decode check applied to breakdown payloads.
    pub shape_check: ShapeCheck,
}

impl ProxyConfig {
    /// Create an empty configuration (no credential, no shape check).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the upstream credential.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = ApiKey::new(key);
        self
    }

    /// Set the breakdown shape check.
    #[must_use]
    pub const fn with_shape_check(mut self, check: ShapeCheck) -> Self {
        self.shape_check = check;
        self
    }

    /// Build configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            api_key: lookup(API_KEY_ENV).and_then(ApiKey::new),
            shape_check: ShapeCheck::default(),
        }
    }
}
