//! docintake Core Library
//!
//! This crate provides configuration, error types and the backend selectors
//! shared by every docintake component.

pub mod config;
pub mod error;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, IntakeConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::{ScannerBackend, StorageBackend};
