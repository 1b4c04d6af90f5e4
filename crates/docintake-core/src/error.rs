//! Error types module
//!
//! This module provides the core error types used throughout docintake.
//! Every failure that reaches the HTTP boundary is expressed as an `AppError`,
//! which knows its status code, machine-readable code and client message.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for security rejections
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "FILE_TOO_LARGE")
    fn error_code(&self) -> &'static str;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden from clients
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("File type not allowed: {0}")]
    FileTypeNotAllowed(String),

    #[error("File too large: {size} bytes exceeds limit of {max} bytes")]
    FileTooLarge { size: u64, max: u64 },

    /// The request body ran past the transport cap before the file was measured.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("File rejected by malware scan: {0}")]
    SecurityRejection(String),

    #[error("Document conversion error: {0}")]
    DocumentConversion(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, sensitive, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, LogLevel) {
    match err {
        AppError::InvalidInput(_) => (400, "INVALID_INPUT", false, LogLevel::Debug),
        AppError::BadRequest(_) => (400, "BAD_REQUEST", false, LogLevel::Debug),
        AppError::FileTypeNotAllowed(_) => (400, "FILE_TYPE_NOT_ALLOWED", false, LogLevel::Debug),
        AppError::FileTooLarge { .. } => (400, "FILE_TOO_LARGE", false, LogLevel::Debug),
        AppError::PayloadTooLarge(_) => (400, "FILE_TOO_LARGE", false, LogLevel::Debug),
        AppError::SecurityRejection(_) => (400, "FILE_REJECTED", true, LogLevel::Warn),
        AppError::DocumentConversion(_) => (500, "CONVERSION_FAILED", true, LogLevel::Error),
        AppError::Storage(_) => (500, "STORAGE_ERROR", true, LogLevel::Error),
        AppError::Internal(_) => (500, "INTERNAL_ERROR", true, LogLevel::Error),
        AppError::InternalWithSource { .. } => (500, "INTERNAL_ERROR", true, LogLevel::Error),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::BadRequest(_) => "BadRequest",
            AppError::FileTypeNotAllowed(_) => "FileTypeNotAllowed",
            AppError::FileTooLarge { .. } => "FileTooLarge",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::SecurityRejection(_) => "SecurityRejection",
            AppError::DocumentConversion(_) => "DocumentConversion",
            AppError::Storage(_) => "Storage",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::BadRequest(ref msg) => msg.clone(),
            AppError::FileTypeNotAllowed(_) => "File type not allowed".to_string(),
            AppError::FileTooLarge { .. } | AppError::PayloadTooLarge(_) => {
                "File size exceeds limit".to_string()
            }
            AppError::SecurityRejection(_) => "File might be infected".to_string(),
            AppError::DocumentConversion(_) => "Failed to convert file to PDF".to_string(),
            AppError::Storage(_) => "Failed to upload file to S3".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::InternalWithSource { .. } => "Internal server error".to_string(),
        }
    }
}
