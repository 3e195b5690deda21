//! Long-running-operation protocol
//!
//! Mutating requests answer `200`/`201`/`202`. When the work continues
//! asynchronously the response carries an `Azure-AsyncOperation` header
//! (preferred; a status document with `{"status": ...}`) or a `Location`
//! header (poll until the status stops being `202`). `Retry-After` suggests
//! the next poll interval.
//!
//! [`Operation::poll`] performs a single status request; callers own the
//! sleep/timeout loop (see `armctl-core`'s `poll_operation`).

use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ArmError, Result};
use crate::{ArmClient, ArmResponse};

/// Status of a long-running operation.
///
/// Open-ended: the service is free to report intermediate states this crate
/// does not know, and those must round-trip rather than fail to parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OperationStatus {
    InProgress,
    Accepted,
    Succeeded,
    Failed,
    Canceled,
    Other(String),
}

impl From<String> for OperationStatus {
    fn from(s: String) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "inprogress" | "running" => OperationStatus::InProgress,
            "accepted" => OperationStatus::Accepted,
            "succeeded" => OperationStatus::Succeeded,
            "failed" => OperationStatus::Failed,
            "canceled" | "cancelled" => OperationStatus::Canceled,
            _ => OperationStatus::Other(s),
        }
    }
}

impl From<OperationStatus> for String {
    fn from(status: OperationStatus) -> Self {
        match status {
            OperationStatus::InProgress => "InProgress".to_string(),
            OperationStatus::Accepted => "Accepted".to_string(),
            OperationStatus::Succeeded => "Succeeded".to_string(),
            OperationStatus::Failed => "Failed".to_string(),
            OperationStatus::Canceled => "Canceled".to_string(),
            OperationStatus::Other(s) => s,
        }
    }
}

impl std::fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", String::from(self.clone()))
    }
}

impl OperationStatus {
    /// The operation has stopped, successfully or not.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OperationStatus::Succeeded | OperationStatus::Failed | OperationStatus::Canceled
        )
    }

    pub fn is_success(&self) -> bool {
        matches!(self, OperationStatus::Succeeded)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, OperationStatus::Failed | OperationStatus::Canceled)
    }
}

/// Provisioning state reported in resource bodies.
///
/// Same open-ended marshaling as [`OperationStatus`]: unknown states are
/// preserved as [`ProvisioningState::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProvisioningState {
    Succeeded,
    Failed,
    Canceled,
    Creating,
    Updating,
    Deleting,
    Accepted,
    Other(String),
}

impl From<String> for ProvisioningState {
    fn from(s: String) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "succeeded" => ProvisioningState::Succeeded,
            "failed" => ProvisioningState::Failed,
            "canceled" | "cancelled" => ProvisioningState::Canceled,
            "creating" => ProvisioningState::Creating,
            "updating" => ProvisioningState::Updating,
            "deleting" => ProvisioningState::Deleting,
            "accepted" => ProvisioningState::Accepted,
            _ => ProvisioningState::Other(s),
        }
    }
}

impl From<ProvisioningState> for String {
    fn from(state: ProvisioningState) -> Self {
        match state {
            ProvisioningState::Succeeded => "Succeeded".to_string(),
            ProvisioningState::Failed => "Failed".to_string(),
            ProvisioningState::Canceled => "Canceled".to_string(),
            ProvisioningState::Creating => "Creating".to_string(),
            ProvisioningState::Updating => "Updating".to_string(),
            ProvisioningState::Deleting => "Deleting".to_string(),
            ProvisioningState::Accepted => "Accepted".to_string(),
            ProvisioningState::Other(s) => s,
        }
    }
}

impl std::fmt::Display for ProvisioningState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", String::from(self.clone()))
    }
}

impl ProvisioningState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProvisioningState::Succeeded | ProvisioningState::Failed | ProvisioningState::Canceled
        )
    }
}

/// Error detail embedded in a failed operation's status document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl OperationError {
    /// Fold into an [`ArmError::OperationFailed`].
    pub fn into_error(self) -> ArmError {
        ArmError::OperationFailed {
            code: self.code.unwrap_or_else(|| "Unknown".to_string()),
            message: self
                .message
                .unwrap_or_else(|| "operation reported no error detail".to_string()),
        }
    }
}

/// Status document behind an `Azure-AsyncOperation` URL.
///
/// A missing `status` field is a protocol violation and surfaces as a JSON
/// error.
#[derive(Debug, Deserialize)]
struct AsyncOperationDocument {
    status: OperationStatus,
    #[serde(default)]
    error: Option<OperationError>,
}

/// Handle to an in-flight (or synchronously completed) operation.
#[derive(Debug, Clone)]
pub struct Operation {
    status_url: Option<Url>,
    location_url: Option<Url>,
    status: OperationStatus,
    error: Option<OperationError>,
    retry_after: Option<Duration>,
}

impl Operation {
    /// Capture the operation handle from the initial mutating response.
    pub(crate) fn from_response(response: &ArmResponse) -> Result<Operation> {
        let status_url = header_url(&response.headers, "azure-asyncoperation")?;
        let location_url = header_url(&response.headers, "location")?;
        let retry_after = header_retry_after(&response.headers);

        let status = if status_url.is_some() || location_url.is_some() {
            OperationStatus::InProgress
        } else if response.status == StatusCode::ACCEPTED {
            // 202 with no way to find out what happened next.
            return Err(ArmError::InvalidResponse(
                "202 Accepted without an Azure-AsyncOperation or Location header".to_string(),
            ));
        } else {
            OperationStatus::Succeeded
        };

        Ok(Operation {
            status_url,
            location_url,
            status,
            error: None,
            retry_after,
        })
    }

    /// Last observed status.
    pub fn status(&self) -> &OperationStatus {
        &self.status
    }

    /// Error detail once the operation reports `Failed`/`Canceled`.
    pub fn error(&self) -> Option<&OperationError> {
        self.error.as_ref()
    }

    /// Poll interval suggested by the service on the last response.
    pub fn retry_after(&self) -> Option<Duration> {
        self.retry_after
    }

    /// URL the operation's status is read from, if it runs asynchronously.
    pub fn status_url(&self) -> Option<&Url> {
        self.status_url.as_ref().or(self.location_url.as_ref())
    }

    pub fn is_done(&self) -> bool {
        self.status.is_terminal()
    }

    /// Build the error a failed operation amounts to.
    pub fn failure(&self) -> ArmError {
        match &self.error {
            Some(detail) => detail.clone().into_error(),
            None => ArmError::OperationFailed {
                code: String::from(self.status.clone()),
                message: format!("operation ended with status {}", self.status),
            },
        }
    }

    /// Perform one status request and update the handle.
    ///
    /// Returns the new status; never sleeps. A `Failed`/`Canceled` status is
    /// returned as `Ok`; the caller decides how to surface it (see
    /// [`Operation::failure`]).
    pub async fn poll(&mut self, client: &ArmClient) -> Result<OperationStatus> {
        if self.status.is_terminal() {
            return Ok(self.status.clone());
        }

        if let Some(url) = self.status_url.clone() {
            let response = client.send_url(Method::GET, url, None).await?;
            self.retry_after = header_retry_after(&response.headers).or(self.retry_after);
            let document: AsyncOperationDocument = serde_json::from_value(response.body)?;
            self.status = document.status;
            self.error = document.error;
        } else if let Some(url) = self.location_url.clone() {
            let response = client.send_url(Method::GET, url, None).await?;
            self.retry_after = header_retry_after(&response.headers).or(self.retry_after);
            self.status = if response.status == StatusCode::ACCEPTED {
                OperationStatus::InProgress
            } else {
                OperationStatus::Succeeded
            };
        }

        Ok(self.status.clone())
    }
}

fn header_url(headers: &HeaderMap, name: &str) -> Result<Option<Url>> {
    let Some(value) = headers.get(name) else {
        return Ok(None);
    };
    let raw = value
        .to_str()
        .map_err(|_| ArmError::InvalidResponse(format!("{name} header is not valid UTF-8")))?;
    Ok(Some(Url::parse(raw)?))
}

fn header_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderMap, HeaderValue};
    use serde_json::Value;

    fn response(status: StatusCode, headers: HeaderMap) -> ArmResponse {
        ArmResponse {
            status,
            headers,
            body: Value::Null,
        }
    }

    #[test]
    fn operation_status_parses_case_insensitively() {
        assert_eq!(
            OperationStatus::from("succeeded".to_string()),
            OperationStatus::Succeeded
        );
        assert_eq!(
            OperationStatus::from("InProgress".to_string()),
            OperationStatus::InProgress
        );
        assert_eq!(
            OperationStatus::from("CANCELLED".to_string()),
            OperationStatus::Canceled
        );
    }

    #[test]
    fn unknown_status_round_trips() {
        let status = OperationStatus::from("MovingResources".to_string());
        assert_eq!(status, OperationStatus::Other("MovingResources".to_string()));
        assert!(!status.is_terminal());
        assert_eq!(String::from(status), "MovingResources");
    }

    #[test]
    fn provisioning_state_terminal_set() {
        assert!(ProvisioningState::Succeeded.is_terminal());
        assert!(ProvisioningState::Failed.is_terminal());
        assert!(ProvisioningState::Canceled.is_terminal());
        assert!(!ProvisioningState::Creating.is_terminal());
        assert!(!ProvisioningState::Other("Scaling".to_string()).is_terminal());
    }

    #[test]
    fn async_operation_header_wins() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "azure-asyncoperation",
            HeaderValue::from_static("https://example.invalid/operations/1"),
        );
        headers.insert(
            "location",
            HeaderValue::from_static("https://example.invalid/locations/1"),
        );
        headers.insert("retry-after", HeaderValue::from_static("15"));

        let op = Operation::from_response(&response(StatusCode::CREATED, headers)).unwrap();
        assert_eq!(op.status(), &OperationStatus::InProgress);
        assert_eq!(op.retry_after(), Some(Duration::from_secs(15)));
        assert_eq!(
            op.status_url().unwrap().as_str(),
            "https://example.invalid/operations/1"
        );
    }

    #[test]
    fn synchronous_completion_without_headers() {
        let op = Operation::from_response(&response(StatusCode::OK, HeaderMap::new())).unwrap();
        assert!(op.is_done());
        assert_eq!(op.status(), &OperationStatus::Succeeded);
    }

    #[test]
    fn accepted_without_operation_url_is_an_error() {
        let err = Operation::from_response(&response(StatusCode::ACCEPTED, HeaderMap::new()))
            .unwrap_err();
        assert!(err.to_string().contains("202"));
    }

    #[test]
    fn failure_without_detail_uses_status() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "location",
            HeaderValue::from_static("https://example.invalid/locations/1"),
        );
        let mut op = Operation::from_response(&response(StatusCode::ACCEPTED, headers)).unwrap();
        op.status = OperationStatus::Canceled;
        let err = op.failure();
        assert!(err.to_string().contains("Canceled"));
    }

    #[test]
    fn status_document_requires_status_field() {
        let doc: std::result::Result<AsyncOperationDocument, _> =
            serde_json::from_str(r#"{"name": "op-1"}"#);
        assert!(doc.is_err());
    }
}
