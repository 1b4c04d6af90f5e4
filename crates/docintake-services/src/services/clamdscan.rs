use async_trait::async_trait;
use docintake_processing::process::{output_with_timeout, CommandError};
use docintake_processing::{ScanVerdict, VirusScanner};
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::process::Command;

/// Scans files by running the `clamdscan` client against a local clamd.
///
/// A file is clean only when the client exits successfully and reports the
/// file as `OK`. Every other outcome is a rejection.
#[derive(Clone, Debug)]
pub struct ClamdscanScanner {
    binary: String,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl Default for ClamdscanScanner {
    fn default() -> Self {
        Self::new("clamdscan", Vec::new(), None)
    }
}

impl ClamdscanScanner {
    /// Create a new scanner.
    ///
    /// # Arguments
    /// * `binary` - clamdscan executable
    /// * `args` - extra arguments placed before the file path (e.g. `--fdpass`)
    /// * `timeout` - per-scan deadline; `None` waits indefinitely
    pub fn new(binary: impl Into<String>, args: Vec<String>, timeout: Option<Duration>) -> Self {
        Self {
            binary: binary.into(),
            args,
            timeout,
        }
    }
}

fn reports_ok(stdout: &str) -> bool {
    stdout.lines().any(|line| line.trim_end().ends_with(": OK"))
}

/// Signature name from a `path: Name FOUND` line.
fn found_signature(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .map(str::trim_end)
        .find(|line| line.ends_with(" FOUND"))
        .and_then(|line| line.rsplit_once(": "))
        .map(|(_, rest)| rest.trim_end_matches(" FOUND").trim().to_string())
}

#[async_trait]
impl VirusScanner for ClamdscanScanner {
    async fn scan(&self, path: &Path) -> ScanVerdict {
        let start = Instant::now();
        tracing::debug!(binary = %self.binary, path = %path.display(), "Starting clamdscan");

        let output = match output_with_timeout(
            Command::new(&self.binary).args(&self.args).arg(path),
            self.timeout,
        )
        .await
        {
            Ok(output) => output,
            Err(CommandError::Spawn(e)) => {
                tracing::error!(error = %e, binary = %self.binary, "Failed to run clamdscan");
                return ScanVerdict::rejected(format!("scanner unavailable: {}", e));
            }
            Err(CommandError::TimedOut(limit)) => {
                tracing::error!(timeout_ms = limit.as_millis() as u64, "clamdscan timed out");
                return ScanVerdict::rejected(format!("scan timed out after {:?}", limit));
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);

        if output.status.success() && reports_ok(&stdout) {
            tracing::info!(
                duration_ms = start.elapsed().as_millis() as u64,
                "File scan completed: clean"
            );
            return ScanVerdict::Clean;
        }

        match found_signature(&stdout) {
            Some(signature) => {
                tracing::warn!(
                    duration_ms = start.elapsed().as_millis() as u64,
                    virus = %signature,
                    "File scan detected virus"
                );
                ScanVerdict::rejected(format!("{} FOUND", signature))
            }
            None => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                tracing::error!(
                    status = %output.status,
                    stderr = %stderr.trim(),
                    "clamdscan did not report the file clean"
                );
                ScanVerdict::rejected(format!("scanner exited with {}", output.status))
            }
        }
    }

    fn name(&self) -> &'static str {
        "clamdscan"
    }
}
