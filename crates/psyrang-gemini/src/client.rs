//! Gemini client.

use url::Url;

use crate::config::GeminiClientConfig;
use crate::error::GeminiResult;
use crate::http::{HttpBackend, ReqwestBackend};

/// Default Gemini client using the reqwest HTTP backend.
pub type DefaultGeminiClient = GeminiClient<ReqwestBackend>;

/// Client for the Gemini `generateContent` method.
///
/// Generic over an HTTP backend so tests can inject a fake. Use
/// `DefaultGeminiClient` in production code.
pub struct GeminiClient<B: HttpBackend> {
    pub(crate) backend: B,
    pub(crate) endpoint: Url,
}

impl DefaultGeminiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: &GeminiClientConfig) -> GeminiResult<Self> {
        let endpoint = Url::parse(config.endpoint())?;
        let backend = ReqwestBackend::new(config)?;
        Ok(Self { backend, endpoint })
    }
}

impl<B: HttpBackend> GeminiClient<B> {
    /// Create a client over a custom backend.
    #[cfg(test)]
    pub(crate) const fn with_backend(endpoint: Url, backend: B) -> Self {
        Self { backend, endpoint }
    }

    /// Endpoint this client posts to (without credential).
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}
