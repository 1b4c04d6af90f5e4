use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tempfile::TempDir;

use docintake_storage::Storage;

use super::error::UploadError;
use super::types::{UploadOutcome, UploadRequest};
use crate::converter::DocumentConverter;
use crate::normalizer::FormatNormalizer;
use crate::scanner::{ScanVerdict, VirusScanner};
use crate::token::TokenIssuer;
use crate::validator::{DocumentValidator, ValidationError};

const SCRATCH_PREFIX: &str = "upload";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";

/// Limits applied to every upload.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub max_file_size: u64,
    pub allowed_extensions: Vec<String>,
    /// Parent of per-request scratch directories; `None` uses the system temp dir.
    pub scratch_root: Option<PathBuf>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_file_size: crate::validator::DEFAULT_MAX_FILE_SIZE,
            allowed_extensions: crate::validator::DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
            scratch_root: None,
        }
    }
}

/// Keep letters, digits, `-` and `_`; everything else becomes `_`.
fn sanitize_name_part(part: &str) -> String {
    part.trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn scratch_file_name(first_name: &str, last_name: &str, extension: &str) -> String {
    format!(
        "{}-{}-{}.{}",
        sanitize_name_part(first_name),
        sanitize_name_part(last_name),
        Utc::now().format(TIMESTAMP_FORMAT),
        extension
    )
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// The document intake pipeline.
///
/// Stages run strictly in order and the first failure ends the run. All
/// intermediate files live in a per-request scratch directory that is removed
/// when `run` returns, whatever the outcome.
pub struct UploadPipeline {
    validator: DocumentValidator,
    scratch_root: Option<PathBuf>,
    scanner: Arc<dyn VirusScanner>,
    normalizer: FormatNormalizer,
    storage: Arc<dyn Storage>,
    tokens: TokenIssuer,
}

impl UploadPipeline {
    pub fn new(
        policy: UploadPolicy,
        scanner: Arc<dyn VirusScanner>,
        converter: Arc<dyn DocumentConverter>,
        storage: Arc<dyn Storage>,
        tokens: TokenIssuer,
    ) -> Self {
        Self {
            validator: DocumentValidator::new(policy.max_file_size, policy.allowed_extensions),
            scratch_root: policy.scratch_root,
            scanner,
            normalizer: FormatNormalizer::new(converter),
            storage,
            tokens,
        }
    }

    fn create_scratch_dir(&self) -> Result<TempDir, UploadError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(SCRATCH_PREFIX);
        let dir = match &self.scratch_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        };
        dir.map_err(UploadError::Scratch)
    }

    #[tracing::instrument(skip_all, fields(submitter_id = %request.submitter_id))]
    pub async fn run(&self, request: UploadRequest) -> Result<UploadOutcome, UploadError> {
        let UploadRequest {
            submitter_id,
            first_name,
            last_name,
            file,
        } = request;

        if submitter_id.trim().is_empty()
            || first_name.trim().is_empty()
            || last_name.trim().is_empty()
        {
            return Err(UploadError::MissingFields);
        }

        let file = file.ok_or(UploadError::MissingFile)?;
        if file.filename.trim().is_empty() {
            return Err(UploadError::EmptyFilename);
        }

        let extension = self
            .validator
            .validate_extension(&file.filename)
            .map_err(|e| {
                tracing::debug!(filename = %file.filename, error = %e, "Rejected file type");
                match e {
                    ValidationError::InvalidExtension { extension, .. } => {
                        UploadError::FileTypeNotAllowed(extension)
                    }
                    _ => UploadError::FileTypeNotAllowed(file.filename.clone()),
                }
            })?;

        // Dropped on every return below, taking the scratch file with it.
        let scratch = self.create_scratch_dir()?;
        let scratch_path = scratch
            .path()
            .join(scratch_file_name(&first_name, &last_name, &extension));

        tokio::fs::write(&scratch_path, &file.data)
            .await
            .map_err(UploadError::Scratch)?;
        drop(file);

        let size = tokio::fs::metadata(&scratch_path)
            .await
            .map_err(UploadError::Scratch)?
            .len();
        if let Err(ValidationError::FileTooLarge { size, max }) =
            self.validator.validate_file_size(size)
        {
            tracing::debug!(size_bytes = size, max_bytes = max, "Rejected oversize file");
            return Err(UploadError::FileTooLarge { size, max });
        }

        self.scan(&scratch_path).await?;

        let final_path = if FormatNormalizer::needs_conversion(&scratch_path) {
            let start = Instant::now();
            let converted = self.normalizer.normalize(&scratch_path).await;
            match converted {
                Ok(path) => {
                    tracing::info!(
                        stage = "convert",
                        duration_ms = elapsed_ms(start),
                        "Converted document to PDF"
                    );
                    path
                }
                Err(e) => {
                    tracing::error!(
                        stage = "convert",
                        duration_ms = elapsed_ms(start),
                        error = %e,
                        "Document conversion failed"
                    );
                    return Err(e.into());
                }
            }
        } else {
            scratch_path
        };

        let start = Instant::now();
        let artifact = self.storage.upload_file(&final_path).await.map_err(|e| {
            tracing::error!(
                stage = "upload",
                duration_ms = elapsed_ms(start),
                error = %e,
                "Storage upload failed"
            );
            UploadError::from(e)
        })?;
        tracing::info!(
            stage = "upload",
            duration_ms = elapsed_ms(start),
            key = %artifact.key,
            backend = %self.storage.backend_type(),
            "Stored document"
        );

        let file_path = final_path.to_string_lossy().into_owned();
        let token = self.tokens.issue(&submitter_id, &file_path, &artifact.url);

        Ok(UploadOutcome {
            file_url: artifact.url,
            file_path,
            token,
        })
    }

    async fn scan(&self, path: &Path) -> Result<(), UploadError> {
        let start = Instant::now();
        match self.scanner.scan(path).await {
            ScanVerdict::Clean => {
                tracing::info!(
                    stage = "scan",
                    scanner = self.scanner.name(),
                    duration_ms = elapsed_ms(start),
                    "File scanned clean"
                );
                Ok(())
            }
            ScanVerdict::Rejected { reason } => {
                tracing::warn!(
                    stage = "scan",
                    scanner = self.scanner.name(),
                    duration_ms = elapsed_ms(start),
                    reason = %reason,
                    "File rejected by malware scan"
                );
                Err(UploadError::Rejected { reason })
            }
        }
    }
}
