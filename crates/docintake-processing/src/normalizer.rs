use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::converter::{ConversionError, DocumentConverter};

/// Brings every accepted document to PDF.
#[derive(Clone)]
pub struct FormatNormalizer {
    converter: Arc<dyn DocumentConverter>,
}

impl FormatNormalizer {
    pub fn new(converter: Arc<dyn DocumentConverter>) -> Self {
        Self { converter }
    }

    /// Whether `path` still needs converting. Compares the extension exactly,
    /// so callers must store files with a lowercased extension.
    pub fn needs_conversion(path: &Path) -> bool {
        path.extension().and_then(|e| e.to_str()) != Some("pdf")
    }

    /// Convert `path` to a sibling `<stem>.pdf` and delete the original.
    ///
    /// On any failure the original is left in place.
    pub async fn normalize(&self, path: &Path) -> Result<PathBuf, ConversionError> {
        let out_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let target = path.with_extension("pdf");

        self.converter.convert(path, out_dir).await?;

        if !tokio::fs::try_exists(&target).await.unwrap_or(false) {
            return Err(ConversionError::MissingOutput(target));
        }

        if let Err(e) = tokio::fs::remove_file(path).await {
            tracing::warn!(
                error = %e,
                path = %path.display(),
                "Failed to remove original after conversion"
            );
        }

        Ok(target)
    }
}
