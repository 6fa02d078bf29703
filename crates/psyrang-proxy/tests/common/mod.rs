//! Shared helpers for psyrang-proxy integration tests.

// Each test binary uses a different subset of these helpers.
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use http_body_util::BodyExt;
use psyrang_core::{
    ApiKey, GenerateContentRequest, GenerateContentResponse, GenerativeApiPort, UpstreamError,
};

/// Upstream fake returning one canned outcome and counting calls.
pub struct FakeUpstream {
    outcome: Result<GenerateContentResponse, UpstreamError>,
    calls: AtomicUsize,
}

impl FakeUpstream {
    /// Reply with one candidate holding `text`.
    pub fn text(text: &str) -> Arc<Self> {
        let response = serde_json::from_value(serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": text}], "role": "model"}}]
        }))
        .expect("valid canned response");
        Self::with(Ok(response))
    }

    /// Reply with a response that has no candidates.
    pub fn no_candidates() -> Arc<Self> {
        Self::with(Ok(GenerateContentResponse::default()))
    }

    /// Fail with the given upstream error.
    pub fn error(err: UpstreamError) -> Arc<Self> {
        Self::with(Err(err))
    }

    fn with(outcome: Result<GenerateContentResponse, UpstreamError>) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            calls: AtomicUsize::new(0),
        })
    }

    /// Number of upstream calls made.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerativeApiPort for FakeUpstream {
    async fn generate_content(
        &self,
        _api_key: &ApiKey,
        _request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

/// Build a JSON POST request.
pub fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

/// Collect a response body as a string.
pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
