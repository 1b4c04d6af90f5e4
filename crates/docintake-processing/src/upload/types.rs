//! Types for the upload pipeline.

use bytes::Bytes;
use serde::Serialize;

/// The file part of an upload as received.
#[derive(Clone, Debug)]
pub struct UploadedFile {
    pub filename: String,
    pub data: Bytes,
}

/// Everything a caller submits for one document.
#[derive(Clone, Debug, Default)]
pub struct UploadRequest {
    pub submitter_id: String,
    pub first_name: String,
    pub last_name: String,
    pub file: Option<UploadedFile>,
}

/// Result of a successful upload, returned to the caller as JSON.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct UploadOutcome {
    pub file_url: String,
    pub file_path: String,
    pub token: String,
}
