//! The proxy pipeline.
//!
//! `ProxyService::handle` takes one raw invocation and produces either a
//! normalized result or a typed error. It keeps no state between
//! invocations; a single instance is shared by every concurrent request.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::decode::{FenceStripper, TextNormalizer, decode_structured};
use crate::domain::{InboundRequest, NormalizedResult, ResponseMode};
use crate::error::{ErrorClass, ProxyError};
use crate::ports::{GenerateContentRequest, GenerativeApiPort};
use crate::settings::ProxyConfig;

/// The only inbound method the proxy accepts.
pub const ALLOWED_METHOD: &str = "POST";

/// One inbound invocation as delivered by the hosting runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRequest {
    /// HTTP method, upper case.
    pub method: String,
    /// Raw request body.
    pub body: Vec<u8>,
}

impl RawRequest {
    /// Create a raw request.
    pub fn new(method: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            method: method.into(),
            body: body.into(),
        }
    }

    /// Convenience constructor for a POST with a body.
    pub fn post(body: impl Into<Vec<u8>>) -> Self {
        Self::new(ALLOWED_METHOD, body)
    }
}

/// Stateless proxy between clients and the generative upstream.
#[derive(Clone)]
pub struct ProxyService {
    config: ProxyConfig,
    upstream: Arc<dyn GenerativeApiPort>,
    normalizer: Arc<dyn TextNormalizer>,
}

impl ProxyService {
    /// Create a service with the default fence-stripping normalizer.
    pub fn new(config: ProxyConfig, upstream: Arc<dyn GenerativeApiPort>) -> Self {
        Self {
            config,
            upstream,
            normalizer: Arc::new(FenceStripper),
        }
    }

    /// Replace the text normalizer used in breakdown mode.
    #[must_use]
    pub fn with_normalizer(mut self, normalizer: Arc<dyn TextNormalizer>) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Configuration this service was built with.
    pub const fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Run one invocation through the pipeline.
    pub async fn handle(&self, request: RawRequest) -> Result<NormalizedResult, ProxyError> {
        let result = self.run(request).await;
        if let Err(e) = &result {
            match e.class() {
                ErrorClass::Client => warn!(status = e.status_code(), "Rejected request: {e}"),
                ErrorClass::Internal => error!("Unexpected proxy failure: {e}"),
                // Logged where they occur, with more context.
                _ => {}
            }
        }
        result
    }

    async fn run(&self, request: RawRequest) -> Result<NormalizedResult, ProxyError> {
        if request.method != ALLOWED_METHOD {
            return Err(ProxyError::MethodNotAllowed {
                method: request.method,
            });
        }

        let Some(api_key) = self.config.api_key.as_ref() else {
            error!("Upstream API key is not configured; refusing request");
            return Err(ProxyError::MissingApiKey);
        };

        let inbound = InboundRequest::from_json_bytes(&request.body)
            .map_err(ProxyError::InvalidPayload)?;

        info!(
            mode = %inbound.mode,
            prompt_len = inbound.prompt.len(),
            "Calling generative upstream"
        );

        let upstream_request = GenerateContentRequest::from_prompt(inbound.prompt);
        let response = self
            .upstream
            .generate_content(api_key, &upstream_request)
            .await
            .inspect_err(|e| error!("Generative upstream error: {e}"))?;

        if let Some(reason) = response.block_reason() {
            warn!(block_reason = %reason, "Upstream flagged the prompt");
        }

        let Some(text) = response.first_candidate_text() else {
            error!(
                candidates = response.candidates.len(),
                "Upstream response carried no candidate text"
            );
            return Err(ProxyError::InvalidUpstreamResponse);
        };

        debug!(mode = %inbound.mode, text_len = text.len(), "Interpreting upstream text");
        self.interpret(inbound.mode, text)
    }

    fn interpret(&self, mode: ResponseMode, text: String) -> Result<NormalizedResult, ProxyError> {
        match mode {
            ResponseMode::Report => Ok(NormalizedResult::report(text)),
            ResponseMode::Breakdown => {
                decode_structured(self.normalizer.as_ref(), &text, self.config.shape_check)
                    .map(NormalizedResult::Breakdown)
                    .map_err(|e| {
                        error!(raw = %text, "Failed to decode breakdown output: {e}");
                        ProxyError::UnexpectedFormat
                    })
            }
        }
    }
}
