use std::path::Path;

/// Default size ceiling: 1.5 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1_572_864;

/// Default document extensions accepted for upload.
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] =
    &["pdf", "doc", "docx", "odt", "rtf", "wps", "wpd"];

/// Document validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: u64, max: u64 },

    #[error("Invalid file extension: {extension} (allowed: {allowed:?})")]
    InvalidExtension {
        extension: String,
        allowed: Vec<String>,
    },

    #[error("Missing file extension: {0}")]
    MissingExtension(String),
}

/// Document validator
///
/// Pure checks against the upload policy. Size is always checked against the
/// byte count measured on disk, never a client-declared length.
#[derive(Debug, Clone)]
pub struct DocumentValidator {
    max_file_size: u64,
    allowed_extensions: Vec<String>,
}

impl Default for DocumentValidator {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_FILE_SIZE,
            DEFAULT_ALLOWED_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        )
    }
}

impl DocumentValidator {
    pub fn new(max_file_size: u64, allowed_extensions: Vec<String>) -> Self {
        Self {
            max_file_size,
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    /// Validate the filename's extension, returning it lowercased.
    ///
    /// The extension is whatever follows the last `.` of the base name, so a
    /// bare `.pdf` counts as a PDF.
    pub fn validate_extension(&self, filename: &str) -> Result<String, ValidationError> {
        let base_name = Path::new(filename)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(filename);
        let extension = base_name
            .rfind('.')
            .map(|idx| base_name[idx + 1..].to_lowercase())
            .filter(|e| !e.is_empty())
            .ok_or_else(|| ValidationError::MissingExtension(filename.to_string()))?;

        if !self.allowed_extensions.contains(&extension) {
            return Err(ValidationError::InvalidExtension {
                extension,
                allowed: self.allowed_extensions.clone(),
            });
        }

        Ok(extension)
    }

    /// Validate the measured size. A file exactly at the ceiling passes.
    pub fn validate_file_size(&self, size: u64) -> Result<(), ValidationError> {
        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }
}
