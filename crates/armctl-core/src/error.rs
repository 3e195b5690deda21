//! Unified error handling for armctl-core
//!
//! Wraps the client's [`ArmError`] with workflow-level failure modes
//! (timeouts, unexpected states) and consistent classification helpers.
//! Workflows attach resource context (name, resource group) with
//! [`CoreError::with_context`] so the message a user sees names what was
//! being worked on.

use std::time::Duration;

use azure_arm::ArmError;
use thiserror::Error;

use crate::config::ConfigError;

/// Core error type for lifecycle workflows.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Error from the management API or the HTTP client
    #[error("ARM API error: {0}")]
    Arm(#[from] ArmError),

    /// A long-running operation did not reach a terminal status in time
    #[error("Operation timed out after {0:?}")]
    OperationTimeout(Duration),

    /// A resource did not reach the awaited state in time
    #[error("Timed out after {timeout:?} waiting for state {target}; last seen {last}")]
    StateWaitTimeout {
        target: String,
        last: String,
        timeout: Duration,
    },

    /// A resource entered a state the waiter does not expect to recover from
    #[error("Resource entered unexpected state {state} while waiting for {target}")]
    UnexpectedState { state: String, target: String },

    /// Input rejected before any request was made
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// An inner error annotated with what was being done
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<CoreError>,
    },
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Annotate this error with the operation it interrupted.
    #[must_use]
    pub fn with_context(self, context: impl Into<String>) -> CoreError {
        CoreError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, looking through context wrappers.
    fn root(&self) -> &CoreError {
        match self {
            CoreError::Context { source, .. } => source.root(),
            other => other,
        }
    }

    /// Returns true if this is a "not found" error (404).
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self.root() {
            CoreError::Arm(e) => e.is_not_found(),
            _ => false,
        }
    }

    /// Returns true if this is an authentication/authorization error (401/403).
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        match self.root() {
            CoreError::Arm(e) => e.is_unauthorized(),
            _ => false,
        }
    }

    /// Returns true if this is a server error (5xx).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        match self.root() {
            CoreError::Arm(e) => e.is_server_error(),
            _ => false,
        }
    }

    /// Returns true if this is a timeout error.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(
            self.root(),
            CoreError::OperationTimeout(_) | CoreError::StateWaitTimeout { .. }
        )
    }

    /// Returns true if this is a rate limiting error (429).
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        match self.root() {
            CoreError::Arm(e) => e.is_rate_limited(),
            _ => false,
        }
    }

    /// Returns true if this error is potentially retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self.root() {
            CoreError::Arm(e) => e.is_retryable(),
            // A timed-out operation may well finish on a retry.
            CoreError::OperationTimeout(_) | CoreError::StateWaitTimeout { .. } => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn not_found() -> ArmError {
        ArmError::NotFound {
            message: "cluster does not exist".to_string(),
        }
    }

    #[test]
    fn arm_errors_delegate_helpers() {
        let err: CoreError = not_found().into();
        assert!(err.is_not_found());
        assert!(!err.is_unauthorized());
        assert!(!err.is_retryable());

        let err: CoreError = ArmError::RateLimited {
            message: "slow down".to_string(),
        }
        .into();
        assert!(err.is_rate_limited());
        assert!(err.is_retryable());
    }

    #[test]
    fn context_preserves_classification() {
        let err = CoreError::from(not_found())
            .with_context("reading Redis Enterprise cluster \"cache-1\" in resource group \"rg-1\"");
        assert!(err.is_not_found());
        let rendered = err.to_string();
        assert!(rendered.contains("cache-1"));
        assert!(rendered.contains("rg-1"));
    }

    #[test]
    fn timeouts_are_retryable() {
        let err = CoreError::OperationTimeout(Duration::from_secs(600));
        assert!(err.is_timeout());
        assert!(err.is_retryable());

        let err = CoreError::StateWaitTimeout {
            target: "Running".to_string(),
            last: "Creating".to_string(),
            timeout: Duration::from_secs(60),
        };
        assert!(err.is_timeout());
        assert!(err.to_string().contains("Running"));
    }

    #[test]
    fn validation_is_not_retryable() {
        let err = CoreError::Validation("sku capacity must be even".to_string());
        assert!(!err.is_retryable());
        assert!(!err.is_timeout());
    }
}
