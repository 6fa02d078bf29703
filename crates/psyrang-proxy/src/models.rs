//! Response bodies produced by the HTTP layer itself.

use serde::{Deserialize, Serialize};

/// JSON error body: `{ "error": "<message>" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Health endpoint body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    /// Healthy status.
    #[must_use]
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_response_shape() {
        let body = ErrorResponse::new("boom");
        assert_eq!(serde_json::to_value(&body).unwrap(), json!({"error": "boom"}));
    }

    #[test]
    fn test_health_response_shape() {
        assert_eq!(
            serde_json::to_value(HealthResponse::ok()).unwrap(),
            json!({"status": "ok"})
        );
    }
}
