//! Error Types

use thiserror::Error;

/// Result type alias for storefront operations
pub type Result<T> = std::result::Result<T, ShopError>;

/// Storefront error types
#[derive(Error, Debug)]
pub enum ShopError {
    /// Request never completed (connection refused, DNS, TLS, ...)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Missing or rejected bearer token
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// API answered with a non-success status
    #[error("API error ({status}): {detail}")]
    Api { status: u16, detail: String },

    /// Response body could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Invalid input rejected before any request was made
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ShopError {
    /// Map a non-success HTTP response, preferring the body's `detail` field
    pub fn from_status(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string))
            .unwrap_or_else(|| body.trim().to_string());

        match status {
            401 => Self::Unauthorized(detail),
            404 => Self::NotFound(detail),
            _ => Self::Api { status, detail },
        }
    }

    /// Get user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            Self::Http(_) => "Could not reach the store. Please check your connection.".into(),
            Self::Unauthorized(_) => "Please log in to continue.".into(),
            Self::NotFound(detail) if detail.is_empty() => "Not found.".into(),
            Self::NotFound(detail) | Self::InvalidRequest(detail) => detail.clone(),
            Self::Api { detail, .. } if !detail.is_empty() => detail.clone(),
            Self::Config(_) => "Store configuration error.".into(),
            _ => "An unexpected error occurred.".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status() {
        let err = ShopError::from_status(404, r#"{"detail": "Product not found"}"#);
        assert!(matches!(err, ShopError::NotFound(ref d) if d == "Product not found"));

        let err = ShopError::from_status(401, r#"{"detail": "Invalid token"}"#);
        assert!(matches!(err, ShopError::Unauthorized(_)));

        let err = ShopError::from_status(502, "  bad gateway\n");
        assert!(matches!(err, ShopError::Api { status: 502, ref detail } if detail == "bad gateway"));
    }

    #[test]
    fn test_user_message_uses_api_detail() {
        let err = ShopError::Api {
            status: 400,
            detail: "Email already registered".into(),
        };
        assert_eq!(err.user_message(), "Email already registered");

        let err = ShopError::Api { status: 500, detail: String::new() };
        assert_eq!(err.user_message(), "An unexpected error occurred.");

        let err = ShopError::Decode("expected value at line 1".into());
        assert_eq!(err.user_message(), "An unexpected error occurred.");
    }
}
