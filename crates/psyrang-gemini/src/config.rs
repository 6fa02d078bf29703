//! Public configuration for the Gemini client.

use std::time::Duration;

use psyrang_core::ENDPOINT_ENV;

/// Default `generateContent` endpoint.
pub const DEFAULT_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent";

/// Configuration for the Gemini client.
///
/// # Example
///
/// ```
/// use psyrang_gemini::GeminiClientConfig;
/// use std::time::Duration;
///
/// let config = GeminiClientConfig::new()
///     .with_endpoint("http://127.0.0.1:9999/generate")
///     .with_timeout(Duration::from_secs(60));
/// ```
#[derive(Debug, Clone)]
pub struct GeminiClientConfig {
    /// Full URL of the `generateContent` method.
    pub(crate) endpoint: String,
    /// User agent string for HTTP requests
    pub(crate) user_agent: String,
    /// Request timeout; `None` leaves it to the hosting environment.
    pub(crate) timeout: Option<Duration>,
}

impl Default for GeminiClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: concat!("psyrang-gemini/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: None,
        }
    }
}

impl GeminiClientConfig {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply overrides from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self::new();
        match lookup(ENDPOINT_ENV) {
            Some(endpoint) if !endpoint.trim().is_empty() => config.with_endpoint(endpoint.trim()),
            _ => config,
        }
    }

    /// Set the endpoint URL.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the user agent string for HTTP requests.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Endpoint URL as configured.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeminiClientConfig::new();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert!(config.user_agent.contains("psyrang-gemini"));
        assert!(config.timeout.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let config = GeminiClientConfig::new()
            .with_endpoint("http://localhost:1234/gen")
            .with_user_agent("test-agent")
            .with_timeout(Duration::from_secs(5));

        assert_eq!(config.endpoint(), "http://localhost:1234/gen");
        assert_eq!(config.user_agent, "test-agent");
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_endpoint_override_from_lookup() {
        let config = GeminiClientConfig::from_lookup(|name| {
            (name == ENDPOINT_ENV).then(|| " http://mock/gen ".to_string())
        });
        assert_eq!(config.endpoint(), "http://mock/gen");

        let blank = GeminiClientConfig::from_lookup(|_| Some(String::new()));
        assert_eq!(blank.endpoint(), DEFAULT_ENDPOINT);
    }
}
