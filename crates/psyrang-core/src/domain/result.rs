//! Normalized result returned to the client on success.

use serde::Serialize;
use serde_json::Value;

/// Successful proxy output.
///
/// Serializes untagged: report mode becomes `{ "report": "..." }`, breakdown
/// mode becomes whatever object the model produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NormalizedResult {
    /// Raw upstream prose.
    Report {
        /// Candidate text, unmodified.
        report: String,
    },
    /// Structured data decoded from the upstream text.
    Breakdown(Value),
}

impl NormalizedResult {
    /// Wrap raw text as a report.
    pub fn report(text: impl Into<String>) -> Self {
        Self::Report {
            report: text.into(),
        }
    }

    /// Serialize to a JSON body.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
