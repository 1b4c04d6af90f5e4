//! Upload pipeline: validate → persist → scan → normalize → store → sign.

mod error;
mod pipeline;
mod types;

pub use error::UploadError;
pub use pipeline::{UploadPipeline, UploadPolicy};
pub use types::{UploadOutcome, UploadRequest, UploadedFile};
