//! docintake Services Layer
//!
//! Production adapters for the pipeline's external collaborators, and a
//! single facade the API crate builds its pipeline from.

pub mod services;

pub use docintake_processing::{
    DocumentConverter, LibreOfficeConverter, ScanVerdict, TokenIssuer, UploadPipeline,
    UploadPolicy, VirusScanner,
};
pub use docintake_storage::{create_storage, Storage, StorageBackend, StorageError};
#[cfg(feature = "clamav")]
pub use services::clamav::ClamAVService;
pub use services::clamdscan::ClamdscanScanner;
pub use services::create_scanner;
