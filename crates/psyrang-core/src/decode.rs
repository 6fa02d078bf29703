//! Best-effort decoding of model output into structured data.
//!
//! Model text is untrusted. Decoding is a pure function that returns a
//! `Result` and never panics. Cleanup of formatting artifacts (fenced code
//! blocks) runs first, behind the `TextNormalizer` trait, so other
//! heuristics can be swapped in without touching the pipeline.

use std::borrow::Cow;

use serde_json::Value;
use thiserror::Error;

/// Marker the model wraps around code blocks.
const FENCE: &str = "```";

/// Errors from decoding model output.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Text was not valid JSON after normalization.
    #[error("Model output is not valid JSON: {0}")]
    Syntax(String),

    /// JSON decoded but failed the configured shape check.
    #[error("Model output has unexpected shape: expected {expected}, got {actual}")]
    Shape {
        /// Shape that was required.
        expected: &'static str,
        /// JSON type that was found.
        actual: &'static str,
    },
}

/// Pre-processing applied to raw model text before JSON decoding.
pub trait TextNormalizer: Send + Sync {
    /// Return the text to decode.
    fn normalize<'a>(&self, raw: &'a str) -> Cow<'a, str>;
}

/// Strips a surrounding fenced code block, with or without a language tag.
///
/// ```
/// use psyrang_core::decode::{FenceStripper, TextNormalizer};
///
/// let raw = "```json\n{\"steps\":[\"a\"]}\n```";
/// assert_eq!(FenceStripper.normalize(raw), "{\"steps\":[\"a\"]}");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FenceStripper;

impl TextNormalizer for FenceStripper {
    fn normalize<'a>(&self, raw: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(strip_fence(raw))
    }
}

/// Remove one leading and one trailing fence marker, plus the info string.
fn strip_fence(raw: &str) -> &str {
    let text = raw.trim();
    let Some(rest) = text.strip_prefix(FENCE) else {
        return text;
    };

    let body = match rest.find('\n') {
        // "```json\n..." or "```\n..."
        Some(idx) if is_info_string(&rest[..idx]) => &rest[idx + 1..],
        // Single-line "```json{...}```"
        _ => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };

    body.trim_end()
        .strip_suffix(FENCE)
        .unwrap_or(body)
        .trim()
}

/// True for an empty or simple language tag such as `json`.
fn is_info_string(s: &str) -> bool {
    s.trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '.'))
}

/// Post-decode shape requirement for breakdown payloads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShapeCheck {
    /// Any JSON value is accepted.
    #[default]
    Any,
    /// Only JSON objects are accepted.
    Object,
}

impl ShapeCheck {
    fn verify(self, value: &Value) -> Result<(), DecodeError> {
        match self {
            Self::Any => Ok(()),
            Self::Object if value.is_object() => Ok(()),
            Self::Object => Err(DecodeError::Shape {
                expected: "object",
                actual: json_type_name(value),
            }),
        }
    }
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Normalize, decode, and shape-check model output.
pub fn decode_structured(
    normalizer: &dyn TextNormalizer,
    raw: &str,
    check: ShapeCheck,
) -> Result<Value, DecodeError> {
    let text = normalizer.normalize(raw);
    let value: Value =
        serde_json::from_str(&text).map_err(|e| DecodeError::Syntax(e.to_string()))?;
    check.verify(&value)?;
    Ok(value)
}
