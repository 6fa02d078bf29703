//! HTTP backend abstraction for the Gemini API.
//!
//! The client talks to a small trait so tests can swap reqwest for a fake
//! that records requests and replays canned responses.

use async_trait::async_trait;
use url::Url;

use crate::config::GeminiClientConfig;
use crate::error::{GeminiError, GeminiResult};

/// Status and body of an HTTP response, whatever the status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body bytes.
    pub body: Vec<u8>,
}

impl RawResponse {
    /// True for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Body as text, replacing invalid UTF-8.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Trait for HTTP backends that can POST a JSON body.
///
/// This is an implementation detail - external code should use the
/// `GenerativeApiPort` trait.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// POST `body` as JSON and return the response, including error statuses.
    async fn post_json(&self, url: &Url, body: Vec<u8>) -> GeminiResult<RawResponse>;
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Production HTTP backend using reqwest. One attempt per call.
pub struct ReqwestBackend {
    client: reqwest::Client,
}

impl ReqwestBackend {
    /// Create a new reqwest backend with the given configuration.
    pub fn new(config: &GeminiClientConfig) -> GeminiResult<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| GeminiError::ClientBuild(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn post_json(&self, url: &Url, body: Vec<u8>) -> GeminiResult<RawResponse> {
        let response = self
            .client
            .post(url.as_str())
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| GeminiError::Network(e.without_url().to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| GeminiError::Network(e.without_url().to_string()))?;

        Ok(RawResponse {
            status,
            body: body.to_vec(),
        })
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================
