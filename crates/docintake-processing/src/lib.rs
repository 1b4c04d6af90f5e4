//! docintake Processing Library
//!
//! The document intake pipeline and the pieces it is made of: validation,
//! malware scanning, PDF normalization and integrity tokens.

pub mod converter;
pub mod normalizer;
pub mod process;
pub mod scanner;
pub mod token;
pub mod upload;
pub mod validator;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

// Re-export commonly used types
pub use converter::{ConversionError, DocumentConverter, LibreOfficeConverter};
pub use normalizer::FormatNormalizer;
pub use scanner::{ScanVerdict, VirusScanner};
pub use token::TokenIssuer;
pub use upload::{
    UploadError, UploadOutcome, UploadPipeline, UploadPolicy, UploadRequest, UploadedFile,
};
pub use validator::{DocumentValidator, ValidationError};
