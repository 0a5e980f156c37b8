//! API response types and wrappers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Standard API response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request was successful
    pub success: bool,

    /// Response data (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Error message (present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Response timestamp
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: Utc::now(),
        }
    }

    /// Create an error response
    pub fn error(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            timestamp: Utc::now(),
        }
    }

    /// Check if the response is successful
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Extract the data, consuming the response
    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

/// Machine-readable error body returned by the API
///
/// The `error` field is a stable snake_case code clients switch on; the
/// `message` is human-readable and carries no internal detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Stable error code (e.g. "invalid_credentials")
    pub error: String,

    /// Human-readable message
    pub message: String,

    /// Response timestamp
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_response() {
        let response = ApiResponse::success(42);
        assert!(response.is_success());
        assert_eq!(response.into_data(), Some(42));
    }

    #[test]
    fn test_error_response() {
        let response: ApiResponse<()> = ApiResponse::error("something failed");
        assert!(!response.is_success());
        assert_eq!(response.error.as_deref(), Some("something failed"));
    }

    #[test]
    fn test_error_body_serialization() {
        let body = ErrorResponse::new("invalid_credentials", "Invalid credentials");
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"error\":\"invalid_credentials\""));
    }
}
