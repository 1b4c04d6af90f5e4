//! HTTP error response conversion
//!
//! Handlers return `Result<_, HttpAppError>`. Domain errors convert into
//! `HttpAppError` and render as `{error, code}` JSON with the status their
//! `AppError` variant prescribes.

use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use docintake_core::{AppError, ErrorMetadata, LogLevel};
use docintake_processing::UploadError;
use serde::Serialize;

pub const MISSING_FIELDS_MESSAGE: &str = "User UUID, First Name, and Last Name are required";
pub const MISSING_FILE_MESSAGE: &str = "No file part";
pub const EMPTY_FILENAME_MESSAGE: &str = "No selected file";

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
}

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from docintake-core)
///
/// Details are withheld unless the handler opts in with [`HttpAppError::with_details`].
#[derive(Debug)]
pub struct HttpAppError {
    pub error: AppError,
    expose_details: bool,
}

impl HttpAppError {
    pub fn new(error: AppError) -> Self {
        Self {
            error,
            expose_details: false,
        }
    }

    /// Allow `details` and `error_type` in the body. Sensitive errors stay opaque.
    pub fn with_details(mut self, expose: bool) -> Self {
        self.expose_details = expose;
        self
    }
}

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError::new(err)
    }
}

/// A body that is not multipart at all.
impl From<MultipartRejection> for HttpAppError {
    fn from(rejection: MultipartRejection) -> Self {
        HttpAppError::new(AppError::InvalidInput(format!(
            "Invalid multipart body: {}",
            rejection.body_text()
        )))
    }
}

/// A multipart body that breaks off, is malformed mid-stream, or runs past
/// the body limit. The last case reports as an oversize file.
impl From<MultipartError> for HttpAppError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return HttpAppError::new(AppError::PayloadTooLarge(err.body_text()));
        }
        HttpAppError::new(AppError::InvalidInput(format!(
            "Failed to read multipart: {}",
            err.body_text()
        )))
    }
}

impl From<UploadError> for HttpAppError {
    fn from(err: UploadError) -> Self {
        let app = match err {
            UploadError::MissingFields => AppError::BadRequest(MISSING_FIELDS_MESSAGE.to_string()),
            UploadError::MissingFile => AppError::BadRequest(MISSING_FILE_MESSAGE.to_string()),
            UploadError::EmptyFilename => {
                AppError::BadRequest(EMPTY_FILENAME_MESSAGE.to_string())
            }
            UploadError::FileTypeNotAllowed(extension) => AppError::FileTypeNotAllowed(extension),
            UploadError::FileTooLarge { size, max } => AppError::FileTooLarge { size, max },
            UploadError::Rejected { reason } => AppError::SecurityRejection(reason),
            UploadError::Conversion(e) => AppError::DocumentConversion(e.to_string()),
            UploadError::Storage(e) => AppError::Storage(e.to_string()),
            UploadError::Scratch(e) => AppError::Internal(format!("Scratch storage error: {}", e)),
        };
        HttpAppError::new(app)
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.error;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let show_details = self.expose_details && !app_error.is_sensitive();
        let body = ErrorResponse {
            error: app_error.client_message(),
            code: app_error.error_code().to_string(),
            details: show_details.then(|| app_error.detailed_message()),
            error_type: show_details.then(|| app_error.error_type().to_string()),
        };

        (status, Json(body)).into_response()
    }
}
