//! Inbound request model.
//!
//! The client sends `{ "prompt": "...", "type": "breakdown" | "report" }`.
//! `type` selects how the upstream text is interpreted once it comes back.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the upstream candidate text should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseMode {
    /// Upstream text encodes structured data (JSON, possibly fenced).
    Breakdown,
    /// Upstream text is opaque prose, passed through unmodified.
    Report,
}

impl ResponseMode {
    /// Wire name of the mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Breakdown => "breakdown",
            Self::Report => "report",
        }
    }
}

impl fmt::Display for ResponseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body accepted by the proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundRequest {
    /// Prompt text forwarded to the upstream model.
    pub prompt: String,
    /// Interpretation mode for the upstream response.
    #[serde(rename = "type")]
    pub mode: ResponseMode,
}

impl InboundRequest {
    /// Create a new inbound request.
    pub fn new(prompt: impl Into<String>, mode: ResponseMode) -> Self {
        Self {
            prompt: prompt.into(),
            mode,
        }
    }

    /// Decode a raw request body and check the prompt invariant.
    ///
    /// Returns a human-readable reason on failure; the caller decides how
    /// to surface it.
    pub fn from_json_bytes(body: &[u8]) -> Result<Self, String> {
        let request: Self =
            serde_json::from_slice(body).map_err(|e| format!("Invalid request body: {e}"))?;

        if request.prompt.trim().is_empty() {
            return Err("Prompt must not be empty".to_string());
        }

        Ok(request)
    }
}
