use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::time::Duration;
use tokio::process::Command;

use crate::process::{output_with_timeout, CommandError};

/// Document conversion errors
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("Failed to start converter: {0}")]
    Spawn(#[source] io::Error),

    #[error("Converter exited with {status}: {stderr}")]
    Failed { status: ExitStatus, stderr: String },

    #[error("Converter timed out after {0:?}")]
    TimedOut(Duration),

    #[error("Converter reported success but produced no output at {0}")]
    MissingOutput(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl From<CommandError> for ConversionError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Spawn(e) => ConversionError::Spawn(e),
            CommandError::TimedOut(limit) => ConversionError::TimedOut(limit),
        }
    }
}

/// Converts a document to PDF, writing `<stem>.pdf` into `out_dir`.
#[async_trait]
pub trait DocumentConverter: Send + Sync {
    async fn convert(&self, input: &Path, out_dir: &Path) -> Result<(), ConversionError>;
}

/// Headless LibreOffice converter.
#[derive(Debug, Clone)]
pub struct LibreOfficeConverter {
    binary: String,
    timeout: Option<Duration>,
}

impl Default for LibreOfficeConverter {
    fn default() -> Self {
        Self::new("libreoffice", None)
    }
}

impl LibreOfficeConverter {
    pub fn new(binary: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }
}

#[async_trait]
impl DocumentConverter for LibreOfficeConverter {
    async fn convert(&self, input: &Path, out_dir: &Path) -> Result<(), ConversionError> {
        let output = output_with_timeout(
            Command::new(&self.binary)
                .arg("--headless")
                .arg("--convert-to")
                .arg("pdf")
                .arg(input)
                .arg("--outdir")
                .arg(out_dir),
            self.timeout,
        )
        .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(ConversionError::Failed {
                status: output.status,
                stderr,
            });
        }

        tracing::debug!(
            input = %input.display(),
            stdout = %String::from_utf8_lossy(&output.stdout).trim(),
            "LibreOffice conversion finished"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn failing_converter_reports_exit_status() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("cv.docx");
        std::fs::write(&input, b"doc").unwrap();

        let converter = LibreOfficeConverter::new("false", None);
        let err = converter.convert(&input, dir.path()).await.unwrap_err();

        assert!(matches!(err, ConversionError::Failed { .. }));
    }

    #[tokio::test]
    async fn missing_binary_is_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("cv.docx");
        std::fs::write(&input, b"doc").unwrap();

        let converter = LibreOfficeConverter::new("/nonexistent/soffice", None);
        let err = converter.convert(&input, dir.path()).await.unwrap_err();

        assert!(matches!(err, ConversionError::Spawn(_)));
    }
}
