//! Running external tools with an optional deadline.

use std::io;
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("failed to start process: {0}")]
    Spawn(#[source] io::Error),

    #[error("process timed out after {0:?}")]
    TimedOut(Duration),
}

/// Run `command` to completion and capture its output.
///
/// With a timeout the child is killed once the deadline passes. Stdin is
/// closed so tools never block waiting for input.
pub async fn output_with_timeout(
    command: &mut Command,
    timeout: Option<Duration>,
) -> Result<Output, CommandError> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    match timeout {
        None => command.output().await.map_err(CommandError::Spawn),
        Some(limit) => match tokio::time::timeout(limit, command.output()).await {
            Ok(result) => result.map_err(CommandError::Spawn),
            Err(_) => Err(CommandError::TimedOut(limit)),
        },
    }
}
