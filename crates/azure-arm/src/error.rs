//! Error types for the ARM client
//!
//! HTTP failures are mapped to typed variants by status code, with the ARM
//! error body (`{"error": {"code", "message"}}`) folded into the message
//! when the service provides one. Classification helpers (`is_not_found`,
//! `is_retryable`, ...) let callers branch without matching variants.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Result type alias for ARM operations.
pub type Result<T> = std::result::Result<T, ArmError>;

/// Error from the ARM client or the management API.
#[derive(Error, Debug)]
pub enum ArmError {
    /// 400 - the request body or parameters were rejected
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// 401 - missing or expired credentials
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// 403 - authenticated but not authorized
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    /// 404 - the resource does not exist
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// 409 - conflicting concurrent operation or existing resource
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// 429 - subscription or tenant throttling
    #[error("Rate limited: {message}")]
    RateLimited { message: String },

    /// 5xx - service-side failure
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Any other non-success status
    #[error("Unexpected response ({status}): {message}")]
    UnexpectedResponse { status: u16, message: String },

    /// A long-running operation reached `Failed` or `Canceled`
    #[error("Operation failed ({code}): {message}")]
    OperationFailed { code: String, message: String },

    /// The service answered in a shape the protocol does not allow
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// A resource ID string did not match the expected hierarchy
    #[error("Invalid resource ID {id:?}: {reason}")]
    InvalidResourceId { id: String, reason: String },

    /// Client was built with missing or inconsistent settings
    #[error("Invalid client configuration: {0}")]
    InvalidConfiguration(String),

    /// Token acquisition failed
    #[error("Credential error: {0}")]
    Credential(String),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Wire shape of an ARM error response body.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    code: Option<String>,
    message: Option<String>,
}

impl ArmError {
    /// Map a non-success HTTP response to a typed error.
    pub(crate) fn from_response(status: StatusCode, body: &str) -> Self {
        let message = extract_message(body);
        match status {
            StatusCode::BAD_REQUEST => ArmError::BadRequest { message },
            StatusCode::UNAUTHORIZED => ArmError::AuthenticationFailed { message },
            StatusCode::FORBIDDEN => ArmError::Forbidden { message },
            StatusCode::NOT_FOUND => ArmError::NotFound { message },
            StatusCode::CONFLICT => ArmError::Conflict { message },
            StatusCode::TOO_MANY_REQUESTS => ArmError::RateLimited { message },
            s if s.is_server_error() => ArmError::ServerError {
                status: s.as_u16(),
                message,
            },
            s => ArmError::UnexpectedResponse {
                status: s.as_u16(),
                message,
            },
        }
    }

    /// Returns true if this is a "not found" error (404).
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, ArmError::NotFound { .. })
    }

    /// Returns true if this is an authentication/authorization error (401/403).
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            ArmError::AuthenticationFailed { .. } | ArmError::Forbidden { .. }
        )
    }

    /// Returns true if this is a server error (5xx).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, ArmError::ServerError { .. })
    }

    /// Returns true if this is a rate limiting error (429).
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ArmError::RateLimited { .. })
    }

    /// Returns true if this is a conflict error (409).
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, ArmError::Conflict { .. })
    }

    /// Returns true if this is a bad request error (400).
    #[must_use]
    pub fn is_bad_request(&self) -> bool {
        matches!(self, ArmError::BadRequest { .. })
    }

    /// Returns true if this error is potentially retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            ArmError::RateLimited { .. } | ArmError::ServerError { .. } => true,
            ArmError::Request(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}

/// Pull `error.code` / `error.message` out of an ARM error body, falling
/// back to the raw body (truncated) when it is not in the standard shape.
fn extract_message(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if let Some(detail) = parsed.error {
            return match (detail.code, detail.message) {
                (Some(code), Some(message)) => format!("{code}: {message}"),
                (Some(code), None) => code,
                (None, Some(message)) => message,
                (None, None) => "unknown error".to_string(),
            };
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "no response body".to_string()
    } else if trimmed.len() > 200 {
        format!("{}...", &trimmed[..200])
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_status_codes_to_variants() {
        let body = r#"{"error":{"code":"ResourceNotFound","message":"no such cluster"}}"#;
        let err = ArmError::from_response(StatusCode::NOT_FOUND, body);
        assert!(err.is_not_found());
        assert!(err.to_string().contains("ResourceNotFound"));
        assert!(err.to_string().contains("no such cluster"));

        let err = ArmError::from_response(StatusCode::TOO_MANY_REQUESTS, "{}");
        assert!(err.is_rate_limited());
        assert!(err.is_retryable());

        let err = ArmError::from_response(StatusCode::BAD_GATEWAY, "upstream down");
        assert!(err.is_server_error());
        assert!(err.is_retryable());

        let err = ArmError::from_response(StatusCode::CONFLICT, "{}");
        assert!(err.is_conflict());
        assert!(!err.is_retryable());
    }

    #[test]
    fn non_arm_error_body_is_preserved() {
        let err = ArmError::from_response(StatusCode::BAD_REQUEST, "plain text failure");
        assert!(err.to_string().contains("plain text failure"));
    }

    #[test]
    fn empty_error_body() {
        let err = ArmError::from_response(StatusCode::UNAUTHORIZED, "");
        assert!(err.is_unauthorized());
        assert!(err.to_string().contains("no response body"));
    }

    #[test]
    fn operation_failed_is_not_retryable() {
        let err = ArmError::OperationFailed {
            code: "InternalServerError".to_string(),
            message: "deployment failed".to_string(),
        };
        assert!(!err.is_retryable());
        assert!(!err.is_not_found());
    }
}
