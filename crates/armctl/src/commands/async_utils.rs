//! `--wait` support for commands that start long-running operations
//!
//! Wraps [`armctl_core::poll_status`] with a spinner and prints the final
//! status in the selected output format.

use std::time::Duration;

use armctl_core::config::PollSettings;
use armctl_core::{OperationHandle, ProgressCallback, ProgressEvent, StatusModel, StatusSource};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::debug;

use crate::error::{ArmCtlError, Result as CliResult};
use crate::output::{OutputFormat, format_status, print_output};

/// Common CLI arguments for async operations
#[derive(Args, Debug, Clone, Default)]
pub struct AsyncOperationArgs {
    /// Wait for operation to complete
    #[arg(long)]
    pub wait: bool,

    /// Maximum time to wait in seconds (profile setting if omitted)
    #[arg(long, requires = "wait")]
    pub wait_timeout: Option<u64>,

    /// Polling interval in seconds (profile setting if omitted)
    #[arg(long, requires = "wait")]
    pub wait_interval: Option<u64>,
}

impl AsyncOperationArgs {
    /// Timeout and interval, falling back to the profile's poll settings
    pub fn durations(&self, poll: &PollSettings) -> (Duration, Duration) {
        let timeout = self
            .wait_timeout
            .map(Duration::from_secs)
            .unwrap_or_else(|| poll.timeout());
        let interval = self
            .wait_interval
            .map(Duration::from_secs)
            .unwrap_or_else(|| poll.interval());
        (timeout, interval)
    }
}

/// Print a submitted model, or wait for its operation when `--wait` was given
///
/// `status_command` is the command a user can run later to check on the
/// operation, printed in table mode.
pub async fn handle_submission<S, T>(
    source: &S,
    submitted: &T,
    handle: Option<&OperationHandle>,
    async_ops: &AsyncOperationArgs,
    poll: &PollSettings,
    output_format: OutputFormat,
    status_command: &str,
) -> CliResult<()>
where
    S: StatusSource + ?Sized,
    T: Serialize,
{
    match handle {
        Some(handle) if async_ops.wait => {
            let (timeout, interval) = async_ops.durations(poll);
            let status = wait_for_operation(source, handle, timeout, interval).await?;
            print_status(&status, output_format)
        }
        Some(handle) => {
            print_output(submitted, output_format)?;
            if output_format == OutputFormat::Table {
                println!();
                println!("Operation: {}", handle);
                println!(
                    "To check on it, run: armctl {} {} --wait",
                    status_command, handle
                );
            }
            Ok(())
        }
        None => {
            if async_ops.wait {
                debug!("Service returned no operation handle; nothing to wait for");
            }
            print_output(submitted, output_format)?;
            Ok(())
        }
    }
}

/// Query an operation once, or wait for it when `--wait` was given
pub async fn handle_status<S: StatusSource + ?Sized>(
    source: &S,
    handle: &OperationHandle,
    async_ops: &AsyncOperationArgs,
    poll: &PollSettings,
    output_format: OutputFormat,
) -> CliResult<()> {
    let status = if async_ops.wait {
        let (timeout, interval) = async_ops.durations(poll);
        wait_for_operation(source, handle, timeout, interval).await?
    } else {
        source.get_status(handle).await?
    };
    print_status(&status, output_format)
}

/// Wait for an operation, updating a spinner on stderr
pub async fn wait_for_operation<S: StatusSource + ?Sized>(
    source: &S,
    handle: &OperationHandle,
    timeout: Duration,
    interval: Duration,
) -> CliResult<StatusModel> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_message("Waiting for operation");

    let result =
        armctl_core::poll_status(source, handle, timeout, interval, Some(spinner_callback(&pb)))
            .await;

    match result {
        Ok(status) => Ok(status),
        Err(e) => {
            if !pb.is_finished() {
                pb.finish_with_message("Operation did not finish");
            }
            Err(ArmCtlError::from(e))
        }
    }
}

fn spinner_callback(pb: &ProgressBar) -> ProgressCallback {
    let pb = pb.clone();
    Box::new(move |event: ProgressEvent| match event {
        ProgressEvent::Started { .. } => pb.set_message("Operation started"),
        ProgressEvent::Polling { status, .. } => {
            pb.set_message(format!("Operation: {}", format_status(&status)));
        }
        ProgressEvent::Completed { .. } => {
            pb.finish_with_message(format!("Operation: {}", format_status("Succeeded")));
        }
        ProgressEvent::Failed { error, .. } => {
            pb.finish_with_message(format!("Operation failed: {}", error));
        }
    })
}

fn print_status(status: &StatusModel, output_format: OutputFormat) -> CliResult<()> {
    print_output(status, output_format)?;
    Ok(())
}
