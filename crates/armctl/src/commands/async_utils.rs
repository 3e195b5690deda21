//! Shared utilities for long-running operations with wait/no-wait support
//!
//! Mutating commands block on completion by default, rendering a spinner
//! fed by the core layer's progress events. `--no-wait` returns as soon as
//! the service accepts the operation and prints the status URL instead.

use std::time::Duration;

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;

use armctl_core::{ProgressCallback, ProgressEvent};
use azure_arm::Operation;

use crate::error::Result as CliResult;
use crate::output::{print_output, OutputFormat};

/// Common CLI arguments for long-running operations
#[derive(Args, Debug, Clone)]
pub struct AsyncOperationArgs {
    /// Return as soon as the service accepts the operation
    #[arg(long)]
    pub no_wait: bool,

    /// Maximum time to wait for completion, in seconds [default: per service]
    #[arg(long)]
    pub wait_timeout: Option<u64>,
}

impl AsyncOperationArgs {
    /// Explicit `--wait-timeout`, or the service's default.
    pub fn timeout_or(&self, default: Duration) -> Duration {
        self.wait_timeout.map(Duration::from_secs).unwrap_or(default)
    }
}

/// Spinner plus the progress callback that drives it.
///
/// With `quiet` (structured output formats) both are inert so progress
/// noise never mixes into JSON/YAML on stdout.
pub fn operation_spinner(quiet: bool) -> (ProgressBar, Option<ProgressCallback>) {
    if quiet {
        return (ProgressBar::hidden(), None);
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed_precise}]")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(120));

    let pb_clone = pb.clone();
    let callback = Box::new(move |event: ProgressEvent| match event {
        ProgressEvent::Started { operation } => {
            pb_clone.set_message(format!("{operation}: submitted"));
        }
        ProgressEvent::Polling {
            operation, status, ..
        } => {
            pb_clone.set_message(format!("{operation}: {status}"));
        }
        ProgressEvent::Completed { operation } => {
            pb_clone.finish_with_message(format!("{operation}: done"));
        }
        ProgressEvent::Failed { operation, error } => {
            pb_clone.finish_with_message(format!("{operation} failed: {error}"));
        }
    }) as ProgressCallback;

    (pb, Some(callback))
}

/// Report an operation that was accepted but not awaited (`--no-wait`).
pub fn print_accepted(
    operation: &Operation,
    output_format: OutputFormat,
    success_message: &str,
) -> CliResult<()> {
    let status_url = operation.status_url().map(|u| u.to_string());

    if output_format.is_human() {
        println!("{success_message}");
        if let Some(url) = &status_url {
            println!("Operation status URL: {url}");
        }
        return Ok(());
    }

    print_output(
        json!({
            "status": operation.status().to_string(),
            "statusUrl": status_url,
        }),
        output_format,
    )
}
