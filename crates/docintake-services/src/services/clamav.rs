use async_trait::async_trait;
use clamav_client::{clean, Tcp};
use docintake_processing::{ScanVerdict, VirusScanner};
use std::path::Path;
use std::str;
use std::time::{Duration, Instant};

/// Scans files by streaming them to a clamd daemon over TCP.
#[derive(Clone, Debug)]
pub struct ClamAVService {
    host: String,
    port: u16,
    /// Per-scan deadline; `None` waits indefinitely
    timeout: Option<Duration>,
}

impl ClamAVService {
    /// Create a new ClamAVService.
    ///
    /// # Arguments
    /// * `host` - ClamAV daemon hostname
    /// * `port` - ClamAV daemon port (typically 3310)
    /// * `timeout` - optional deadline for each scan
    pub fn new(host: String, port: u16, timeout: Option<Duration>) -> Self {
        Self {
            host,
            port,
            timeout,
        }
    }
}

/// Signature name from a clamd `stream: Name FOUND` reply.
fn virus_name(response: &[u8]) -> String {
    let response_str = str::from_utf8(response).map(str::trim).unwrap_or("unknown");
    if response_str.contains("FOUND") {
        response_str
            .split(':')
            .nth(1)
            .unwrap_or("unknown")
            .split_whitespace()
            .next()
            .unwrap_or("unknown")
            .to_string()
    } else {
        "unknown".to_string()
    }
}

#[async_trait]
impl VirusScanner for ClamAVService {
    /// Runs the sync client inside spawn_blocking to avoid !Send futures.
    async fn scan(&self, path: &Path) -> ScanVerdict {
        let start = Instant::now();
        tracing::debug!(host = %self.host, port = %self.port, "Starting ClamAV scan");
        let address = format!("{}:{}", self.host, self.port);
        let path = path.to_path_buf();

        let task = tokio::task::spawn_blocking(move || {
            let connection = Tcp {
                host_address: address.as_str(),
            };
            clamav_client::scan_file(&path, connection, None)
        });

        let joined = match self.timeout {
            None => task.await,
            Some(limit) => match tokio::time::timeout(limit, task).await {
                Ok(joined) => joined,
                Err(_) => {
                    tracing::error!(
                        timeout_ms = limit.as_millis() as u64,
                        "ClamAV scan timeout"
                    );
                    return ScanVerdict::rejected(format!("scan timed out after {:?}", limit));
                }
            },
        };

        let response = match joined {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                tracing::error!(error = %e, "ClamAV scan failed");
                return ScanVerdict::rejected(format!("ClamAV scan error: {}", e));
            }
            Err(e) => {
                tracing::error!(error = %e, "ClamAV scan task join error");
                return ScanVerdict::rejected(format!("ClamAV scan task failed: {}", e));
            }
        };

        match clean(&response) {
            Ok(true) => {
                tracing::info!(
                    duration_ms = start.elapsed().as_millis() as u64,
                    "File scan completed: clean"
                );
                ScanVerdict::Clean
            }
            Ok(false) => {
                let virus = virus_name(&response);
                tracing::warn!(
                    duration_ms = start.elapsed().as_millis() as u64,
                    virus = %virus,
                    "File scan detected virus"
                );
                ScanVerdict::rejected(format!("{} FOUND", virus))
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to parse ClamAV response");
                ScanVerdict::rejected(format!("Failed to parse ClamAV response: {}", e))
            }
        }
    }

    fn name(&self) -> &'static str {
        "clamd"
    }
}
