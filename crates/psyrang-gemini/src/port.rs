//! `GenerativeApiPort` implementation for `GeminiClient`.

use async_trait::async_trait;
use psyrang_core::{
    ApiKey, GenerateContentRequest, GenerateContentResponse, GenerativeApiPort, UpstreamError,
};
use tracing::{debug, error};

use crate::client::GeminiClient;
use crate::error::{GeminiError, GeminiResult};
use crate::http::HttpBackend;
use crate::url::{build_generate_url, redacted};

impl<B: HttpBackend> GeminiClient<B> {
    async fn call(
        &self,
        api_key: &ApiKey,
        request: &GenerateContentRequest,
    ) -> GeminiResult<GenerateContentResponse> {
        let url = build_generate_url(&self.endpoint, api_key);
        let body = serde_json::to_vec(request)?;

        debug!(endpoint = %redacted(&url), bytes = body.len(), "POST generateContent");
        let response = self.backend.post_json(&url, body).await?;

        if !response.is_success() {
            let body = response.text();
            error!(status = response.status, "Gemini API error: {body}");
            return Err(GeminiError::ApiRequestFailed {
                status: response.status,
                body,
            });
        }

        Ok(serde_json::from_slice(&response.body)?)
    }
}

#[async_trait]
impl<B: HttpBackend> GenerativeApiPort for GeminiClient<B> {
    async fn generate_content(
        &self,
        api_key: &ApiKey,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, UpstreamError> {
        self.call(api_key, request).await.map_err(Into::into)
    }
}
