use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Storage backend types
///
/// Selects where finished PDFs are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    S3,
    Local,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "s3" => Ok(StorageBackend::S3),
            "local" => Ok(StorageBackend::Local),
            _ => Err(anyhow::anyhow!("Invalid storage backend: {}", s)),
        }
    }
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StorageBackend::S3 => write!(f, "s3"),
            StorageBackend::Local => write!(f, "local"),
        }
    }
}

/// Malware scanner backend types
///
/// `Clamdscan` shells out to the `clamdscan` client, `Clamd` talks to the
/// daemon directly over TCP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScannerBackend {
    Clamdscan,
    Clamd,
}

impl FromStr for ScannerBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "clamdscan" => Ok(ScannerBackend::Clamdscan),
            "clamd" | "clamav" => Ok(ScannerBackend::Clamd),
            _ => Err(anyhow::anyhow!("Invalid scanner backend: {}", s)),
        }
    }
}

impl Display for ScannerBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ScannerBackend::Clamdscan => write!(f, "clamdscan"),
            ScannerBackend::Clamd => write!(f, "clamd"),
        }
    }
}
