//! Wiring of the pipeline's production collaborators.

use crate::state::AppState;
use anyhow::{Context, Result};
use docintake_core::Config;
use docintake_processing::{LibreOfficeConverter, TokenIssuer, UploadPipeline, UploadPolicy};
use docintake_services::{create_scanner, create_storage};
use std::sync::Arc;

pub fn upload_policy(config: &Config) -> UploadPolicy {
    UploadPolicy {
        max_file_size: config.max_file_size_bytes(),
        allowed_extensions: config.allowed_extensions().to_vec(),
        scratch_root: config.scratch_dir().cloned(),
    }
}

pub async fn initialize_services(config: &Config) -> Result<Arc<AppState>> {
    let storage = create_storage(config)
        .await
        .context("Failed to initialize storage backend")?;
    tracing::info!(backend = %storage.backend_type(), "Storage backend initialized");

    let scanner = create_scanner(config).context("Failed to initialize malware scanner")?;
    tracing::info!(scanner = scanner.name(), "Malware scanner initialized");

    let converter = Arc::new(LibreOfficeConverter::new(
        config.libreoffice_path(),
        config.convert_timeout(),
    ));

    let pipeline = UploadPipeline::new(
        upload_policy(config),
        scanner,
        converter,
        storage,
        TokenIssuer::new(config.token_signing_secret()),
    );

    Ok(Arc::new(AppState::new(config, pipeline)))
}
