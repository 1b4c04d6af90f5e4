//! Malware scanning seam.
//!
//! Scanners report a two-case verdict. Anything short of a positive clean
//! result, including a missing tool or unreadable output, is `Rejected`.

use async_trait::async_trait;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanVerdict {
    Clean,
    Rejected { reason: String },
}

impl ScanVerdict {
    pub fn rejected(reason: impl Into<String>) -> Self {
        ScanVerdict::Rejected {
            reason: reason.into(),
        }
    }

    pub fn is_clean(&self) -> bool {
        matches!(self, ScanVerdict::Clean)
    }
}

/// Scans a file on local disk. Implementations must not modify or delete it.
#[async_trait]
pub trait VirusScanner: Send + Sync {
    async fn scan(&self, path: &Path) -> ScanVerdict;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}
