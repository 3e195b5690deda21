//! Progress tracking and operation polling
//!
//! Mutating ARM requests return an [`Operation`] which must be polled until
//! a terminal status. This module provides that loop with optional progress
//! callbacks for UI updates.

use std::time::{Duration, Instant};

use azure_arm::{ArmClient, Operation, OperationStatus};

use crate::error::{CoreError, Result};

/// Progress events emitted while waiting on an operation
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// The operation has been accepted by the service
    Started { operation: String },
    /// Polling iteration with current status
    Polling {
        operation: String,
        status: String,
        elapsed: Duration,
    },
    /// The operation completed successfully
    Completed { operation: String },
    /// The operation failed or was canceled
    Failed { operation: String, error: String },
}

/// Callback type for progress updates
///
/// The CLI uses this to update spinners; library callers typically pass
/// `None`.
pub type ProgressCallback = Box<dyn Fn(ProgressEvent) + Send + Sync>;

/// Poll an operation until it reaches a terminal status.
///
/// `label` names the operation in progress events ("create cluster
/// \"cache-1\""). The poll cadence is `interval`, except when the service
/// suggests a longer `Retry-After`. Times out with
/// [`CoreError::OperationTimeout`].
///
/// # Example
///
/// ```rust,ignore
/// let operation = handler.delete_cluster(&id).await?;
/// poll_operation(
///     &client,
///     operation,
///     "delete cluster",
///     Duration::from_secs(1800),
///     Duration::from_secs(10),
///     None,
/// ).await?;
/// ```
pub async fn poll_operation(
    client: &ArmClient,
    mut operation: Operation,
    label: &str,
    timeout: Duration,
    interval: Duration,
    on_progress: Option<ProgressCallback>,
) -> Result<()> {
    let start = Instant::now();

    emit(
        &on_progress,
        ProgressEvent::Started {
            operation: label.to_string(),
        },
    );

    loop {
        match operation.status() {
            OperationStatus::Succeeded => {
                emit(
                    &on_progress,
                    ProgressEvent::Completed {
                        operation: label.to_string(),
                    },
                );
                return Ok(());
            }
            status if status.is_failure() => {
                let error = operation.failure();
                emit(
                    &on_progress,
                    ProgressEvent::Failed {
                        operation: label.to_string(),
                        error: error.to_string(),
                    },
                );
                return Err(error.into());
            }
            _ => {}
        }

        let elapsed = start.elapsed();
        if elapsed > timeout {
            return Err(CoreError::OperationTimeout(timeout));
        }

        let status = operation.poll(client).await?;
        emit(
            &on_progress,
            ProgressEvent::Polling {
                operation: label.to_string(),
                status: status.to_string(),
                elapsed,
            },
        );

        if !status.is_terminal() {
            // Honor the service's suggested interval when it is slower than
            // ours.
            let sleep_for = operation
                .retry_after()
                .filter(|suggested| *suggested > interval)
                .unwrap_or(interval);
            tokio::time::sleep(sleep_for).await;
        }
    }
}

/// Helper to emit progress events
fn emit(callback: &Option<ProgressCallback>, event: ProgressEvent) {
    if let Some(cb) = callback {
        cb(event);
    }
}
