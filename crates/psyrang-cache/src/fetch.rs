//! Network access for asset population and cache misses.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use crate::error::{CacheError, CacheResult};
use crate::response::AssetResponse;

/// Fetches one asset from the network.
///
/// Error statuses are returned as responses, not errors. Callers decide
/// whether a 404 is fatal.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// GET `url`.
    async fn fetch(&self, url: &Url) -> CacheResult<AssetResponse>;
}

/// Default timeout for a single asset request.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Production fetcher using reqwest.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with the default timeout.
    pub fn new() -> CacheResult<Self> {
        Self::with_timeout(DEFAULT_FETCH_TIMEOUT)
    }

    /// Create a fetcher with a custom per-request timeout.
    pub fn with_timeout(timeout: Duration) -> CacheResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("psyrang-cache/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| CacheError::Network {
                url: String::new(),
                message: e.to_string(),
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> CacheResult<AssetResponse> {
        let network = |e: reqwest::Error| CacheError::Network {
            url: url.to_string(),
            message: e.without_url().to_string(),
        };

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(network)?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string);
        let body = response.bytes().await.map_err(network)?;

        debug!(%url, status, bytes = body.len(), "Fetched asset");

        Ok(AssetResponse {
            url: url.to_string(),
            status,
            content_type,
            body: body.to_vec(),
        })
    }
}
