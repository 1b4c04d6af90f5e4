use docintake_storage::StorageError;

use crate::converter::ConversionError;

/// Why an upload did not produce a stored document.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("submitter id, first name and last name are required")]
    MissingFields,

    #[error("no file part in request")]
    MissingFile,

    #[error("file part has an empty filename")]
    EmptyFilename,

    #[error("file type not allowed: {0}")]
    FileTypeNotAllowed(String),

    #[error("file size {size} exceeds limit of {max} bytes")]
    FileTooLarge { size: u64, max: u64 },

    #[error("file rejected by malware scan: {reason}")]
    Rejected { reason: String },

    #[error("conversion to PDF failed: {0}")]
    Conversion(#[from] ConversionError),

    #[error("upload to storage failed: {0}")]
    Storage(#[from] StorageError),

    #[error("scratch storage failed: {0}")]
    Scratch(#[source] std::io::Error),
}
