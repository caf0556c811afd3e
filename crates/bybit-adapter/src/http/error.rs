/*
[INPUT]:  Error sources (HTTP transport, API envelopes, serialization)
[OUTPUT]: Structured error types with context and retry hints
[POS]:    Error handling layer - unified error type for the REST surface
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Error type for REST calls against the Bybit API
#[derive(Error, Debug)]
pub enum BybitError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API envelope carried a non-zero retCode
    #[error("API error (retCode {code}): {message}")]
    Api { code: i64, message: String },

    /// Endpoint requires credentials but none are configured
    #[error("endpoint requires API credentials")]
    MissingCredentials,

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Well-formed envelope with a missing or unexpected body
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {retry_after}s")]
    RateLimit { retry_after: u64 },
}

impl BybitError {
    /// Check if the error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BybitError::Http(_) | BybitError::RateLimit { .. } | BybitError::InvalidResponse(_)
        )
    }

    /// Get retry delay in seconds (if retryable)
    pub fn retry_delay(&self) -> Option<u64> {
        match self {
            BybitError::RateLimit { retry_after } => Some(*retry_after),
            _ => None,
        }
    }

    /// Create an API error from an HTTP status and message, used when the
    /// server rejects the request before producing a response envelope
    pub fn api_error(status: StatusCode, message: impl Into<String>) -> Self {
        BybitError::Api {
            code: i64::from(status.as_u16()),
            message: message.into(),
        }
    }
}

/// Result type alias for REST operations
pub type Result<T> = std::result::Result<T, BybitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_retryable() {
        let rate_err = BybitError::RateLimit { retry_after: 2 };
        assert!(rate_err.is_retryable());
        assert_eq!(rate_err.retry_delay(), Some(2));

        let auth_err = BybitError::MissingCredentials;
        assert!(!auth_err.is_retryable());
        assert_eq!(auth_err.retry_delay(), None);
    }

    #[test]
    fn test_api_error_creation() {
        let err = BybitError::api_error(StatusCode::BAD_REQUEST, "Invalid symbol");
        match err {
            BybitError::Api { code, message } => {
                assert_eq!(code, 400);
                assert_eq!(message, "Invalid symbol");
            }
            _ => panic!("Expected Api error variant"),
        }
    }
}
