//! Status polling for long-running operations
//!
//! Submissions return an [`OperationHandle`] that must be polled until the
//! operation reaches a terminal state. Adapters never poll on their own; this
//! module provides the loop for callers that want to wait, with optional
//! progress callbacks for UI updates.

use crate::error::{CoreError, Result};
use crate::operation::{OperationHandle, OperationState, StatusModel};
use async_trait::async_trait;
use std::time::{Duration, Instant};

/// Progress events emitted while waiting on an operation
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Polling has started
    Started { handle: OperationHandle },
    /// One status query returned a non-terminal state
    Polling {
        handle: OperationHandle,
        status: String,
        elapsed: Duration,
    },
    /// Operation succeeded
    Completed { handle: OperationHandle },
    /// Operation failed
    Failed {
        handle: OperationHandle,
        error: String,
    },
}

/// Callback type for progress updates
///
/// The CLI uses this to update its spinner.
pub type ProgressCallback = Box<dyn Fn(ProgressEvent) + Send + Sync>;

/// Anything that can report the status of an operation handle
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn get_status(&self, handle: &OperationHandle) -> Result<StatusModel>;
}

/// Poll an operation until it succeeds, fails or `timeout` elapses
///
/// # Example
///
/// ```rust,ignore
/// use armctl_core::progress::{poll_status, ProgressEvent};
/// use std::time::Duration;
///
/// let exported = adapter.export(&request).await?;
/// let handle = exported.tracking.operation_status_link.clone().unwrap();
///
/// let status = poll_status(
///     &adapter,
///     &handle,
///     Duration::from_secs(1800),
///     Duration::from_secs(10),
///     Some(Box::new(|event| {
///         if let ProgressEvent::Polling { status, elapsed, .. } = event {
///             println!("Status: {} ({:.0}s)", status, elapsed.as_secs());
///         }
///     })),
/// )
/// .await?;
/// ```
pub async fn poll_status<S: StatusSource + ?Sized>(
    source: &S,
    handle: &OperationHandle,
    timeout: Duration,
    interval: Duration,
    on_progress: Option<ProgressCallback>,
) -> Result<StatusModel> {
    let start = Instant::now();

    emit(
        &on_progress,
        ProgressEvent::Started {
            handle: handle.clone(),
        },
    );

    loop {
        let elapsed = start.elapsed();
        if elapsed > timeout {
            return Err(CoreError::TaskTimeout(timeout));
        }

        let status = source.get_status(handle).await?;
        tracing::debug!("Operation {} is {}", handle, status.status);

        match status.state {
            OperationState::Succeeded => {
                emit(
                    &on_progress,
                    ProgressEvent::Completed {
                        handle: handle.clone(),
                    },
                );
                return Ok(status);
            }
            OperationState::Failed => {
                let error = status
                    .error_message
                    .clone()
                    .unwrap_or_else(|| format!("Operation failed with status: {}", status.status));

                emit(
                    &on_progress,
                    ProgressEvent::Failed {
                        handle: handle.clone(),
                        error: error.clone(),
                    },
                );
                return Err(CoreError::TaskFailed(error));
            }
            OperationState::Pending | OperationState::InProgress => {
                emit(
                    &on_progress,
                    ProgressEvent::Polling {
                        handle: handle.clone(),
                        status: status.status.clone(),
                        elapsed,
                    },
                );
                tokio::time::sleep(interval).await;
            }
        }
    }
}

/// Helper to emit progress events
fn emit(callback: &Option<ProgressCallback>, event: ProgressEvent) {
    if let Some(cb) = callback {
        cb(event);
    }
}
