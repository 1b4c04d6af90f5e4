//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::keys;
use crate::StorageBackend;
use async_trait::async_trait;
use std::path::Path;
use std::pin::Pin;
use thiserror::Error;
use tokio::io::AsyncRead;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A document persisted in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArtifact {
    pub key: String,
    pub url: String,
}

/// Storage abstraction trait
///
/// All storage backends (S3-compatible, local filesystem) implement this
/// trait so the upload pipeline never couples to a specific provider.
/// Objects are written world-readable; the returned URL is the public address.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Upload from a reader under `key` and return the public URL.
    ///
    /// The reader is consumed until EOF.
    async fn upload_stream(
        &self,
        key: &str,
        content_type: &str,
        content_length: Option<u64>,
        reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<String>;

    /// Public URL an object with `key` is (or would be) served from
    fn public_url(&self, key: &str) -> String;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;

    /// Upload a local file, keyed by its base name.
    ///
    /// Failing to open the file is reported as `UploadFailed`, the same as a
    /// transport failure.
    async fn upload_file(&self, path: &Path) -> StorageResult<StoredArtifact> {
        let key = keys::object_key_for(path)?;
        let content_type = keys::content_type_for(&key);

        let file = tokio::fs::File::open(path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to open {}: {}", path.display(), e))
        })?;
        let content_length = file.metadata().await.ok().map(|m| m.len());

        let url = self
            .upload_stream(&key, content_type, content_length, Box::pin(file))
            .await?;

        Ok(StoredArtifact { key, url })
    }
}
