//! Shared key derivation for storage backends.

use std::path::Path;

use crate::traits::{StorageError, StorageResult};

/// Derive the object key for a local file: its base name.
pub fn object_key_for(path: &Path) -> StorageResult<String> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| StorageError::InvalidKey(format!("{} has no file name", path.display())))?;
    validate_key(name)?;
    Ok(name.to_string())
}

/// Keys must be a single, non-empty path segment.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() || key.contains("..") || key.contains('/') || key.contains('\\') {
        return Err(StorageError::InvalidKey(format!(
            "Storage key is not a plain file name: {:?}",
            key
        )));
    }
    Ok(())
}

/// Content type recorded with the stored object.
pub fn content_type_for(key: &str) -> &'static str {
    let ext = key.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some("pdf") => "application/pdf",
        Some("doc") => "application/msword",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        Some("odt") => "application/vnd.oasis.opendocument.text",
        Some("rtf") => "application/rtf",
        _ => "application/octet-stream",
    }
}
