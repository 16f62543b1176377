//! Error types for the SDK.
//!
//! Both vendor clients report failures through [`SdkError`]. The variants
//! separate transport failures, HTTP-level failures and vendor business
//! errors so callers can decide between retrying and showing a message.

use thiserror::Error;

/// Result type for SDK operations.
pub type Result<T> = std::result::Result<T, SdkError>;

/// Errors that can occur when using the SDK.
#[derive(Error, Debug)]
pub enum SdkError {
    /// Transport failure (connect, timeout, TLS) after all retries.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response, or a body that is not valid JSON.
    #[error("HTTP error ({status}): {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// Vendor business error: a non-zero `code` / `errCode` in the envelope.
    #[error("Business error [{code}]: {message}")]
    Business {
        /// Vendor error code.
        code: i64,
        /// Vendor error message.
        message: String,
        /// Full decoded response, when one was available.
        response: Option<serde_json::Value>,
    },

    /// Local input validation failed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A well-formed response lacked a field the SDK relies on.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Token cache backend error.
    #[error("Cache error: {0}")]
    Cache(String),

    /// Local I/O error (file uploads).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SdkError {
    /// Returns true if repeating the call may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            SdkError::Network(e) => e.is_connect() || e.is_timeout(),
            SdkError::Http { status, .. } => matches!(status, 408 | 429 | 500..=599),
            _ => false,
        }
    }

    /// Returns true for transport-level failures.
    pub fn is_network(&self) -> bool {
        matches!(self, SdkError::Network(_))
    }

    /// Returns true for vendor business errors.
    pub fn is_business(&self) -> bool {
        matches!(self, SdkError::Business { .. })
    }

    /// Returns the HTTP status code if available.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            SdkError::Http { status, .. } => Some(*status),
            SdkError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns the vendor business code if available.
    pub fn business_code(&self) -> Option<i64> {
        match self {
            SdkError::Business { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub(crate) fn missing(field: &str) -> Self {
        SdkError::Validation(format!("{field} is required"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SdkError::Business {
            code: 1435002,
            message: "signFlowId does not exist".to_string(),
            response: None,
        };
        assert_eq!(
            err.to_string(),
            "Business error [1435002]: signFlowId does not exist"
        );

        let err = SdkError::Http {
            status: 502,
            body: "bad gateway".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP error (502): bad gateway");
    }

    #[test]
    fn test_is_retryable() {
        let unavailable = SdkError::Http {
            status: 503,
            body: String::new(),
        };
        assert!(unavailable.is_retryable());

        let not_found = SdkError::Http {
            status: 404,
            body: String::new(),
        };
        assert!(!not_found.is_retryable());

        let business = SdkError::Business {
            code: 1001,
            message: "denied".to_string(),
            response: None,
        };
        assert!(!business.is_retryable());
        assert!(business.is_business());
    }

    #[test]
    fn test_codes() {
        let err = SdkError::Http {
            status: 500,
            body: "oops".to_string(),
        };
        assert_eq!(err.status_code(), Some(500));
        assert_eq!(err.business_code(), None);

        let err = SdkError::Business {
            code: 1004,
            message: "token expired".to_string(),
            response: None,
        };
        assert_eq!(err.status_code(), None);
        assert_eq!(err.business_code(), Some(1004));
    }

    #[test]
    fn test_missing_names_field() {
        let err = SdkError::missing("TextContent.content");
        assert_eq!(
            err.to_string(),
            "Validation error: TextContent.content is required"
        );
    }
}
