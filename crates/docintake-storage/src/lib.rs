//! docintake Storage Library
//!
//! This crate provides the storage abstraction for finished documents and its
//! implementations for S3-compatible object stores and the local filesystem.
//!
//! # Storage key format
//!
//! Keys are flat: the object key is the base name of the uploaded file, so
//! `/tmp/upload1234/Ada-Lovelace-2024-01-01-00-00-00.pdf` is stored as
//! `Ada-Lovelace-2024-01-01-00-00-00.pdf`. Keys must not contain `..` or a
//! path separator. Key derivation is centralized in the `keys` module.

pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use docintake_core::StorageBackend;
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult, StoredArtifact};
