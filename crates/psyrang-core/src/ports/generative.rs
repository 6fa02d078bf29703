//! Generative-text upstream port.
//!
//! This port defines the single call the proxy makes to the upstream
//! `generateContent` API, along with the wire types for that call. The
//! transport (reqwest, a test fake) lives in an adapter crate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::settings::ApiKey;

// =============================================================================
// Request Types
// =============================================================================

/// Body of a `generateContent` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateContentRequest {
    /// Content blocks; the proxy always sends exactly one.
    pub contents: Vec<RequestContent>,
}

/// One content block of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContent {
    /// Parts of the block.
    pub parts: Vec<RequestPart>,
}

/// A single text part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestPart {
    /// The text content.
    pub text: String,
}

impl GenerateContentRequest {
    /// Wrap a prompt in the single-block envelope the upstream expects.
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: prompt.into(),
                }],
            }],
        }
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// Decoded `generateContent` response.
///
/// Only the fields the proxy reads are modelled; everything else is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Alternative outputs. Missing in the payload means none.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Feedback about the prompt (e.g. if it was blocked).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<PromptFeedback>,
}

/// One generated alternative.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<CandidateContent>,
    /// Why generation stopped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Content of a candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// A part of candidate content. Non-text parts deserialize with `text: None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidatePart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Feedback about the prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Reason the prompt was blocked, if it was.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate.
    ///
    /// Text parts are joined in order. Returns `None` when there is no
    /// candidate or the first candidate carries no text part at all.
    pub fn first_candidate_text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let mut texts = content.parts.iter().filter_map(|p| p.text.as_deref()).peekable();
        texts.peek()?;
        Some(texts.collect())
    }

    /// Block reason reported for the prompt, if any.
    pub fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
    }
}

// =============================================================================
// Port
// =============================================================================

/// Errors surfaced by a generative upstream adapter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    /// The upstream answered with a non-success status.
    #[error("Upstream returned status {status}: {body}")]
    Status {
        /// HTTP status code from the upstream.
        status: u16,
        /// Raw response body text.
        body: String,
    },

    /// The upstream could not be reached or the body could not be read.
    #[error("Upstream request failed: {0}")]
    Transport(String),

    /// The upstream answered 2xx but the body was not a valid response.
    #[error("Failed to decode upstream response: {0}")]
    Decode(String),
}

/// Port for calling the upstream text-generation API.
///
/// Implementations make exactly one attempt per call; retry policy belongs
/// to the caller of the proxy, not here.
#[async_trait]
pub trait GenerativeApiPort: Send + Sync {
    /// Run one `generateContent` call with the given credential.
    async fn generate_content(
        &self,
        api_key: &ApiKey,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, UpstreamError>;
}
