//! In-memory fakes for the pipeline's collaborators.

use async_trait::async_trait;
use docintake_storage::{Storage, StorageBackend, StorageError, StorageResult};
use std::collections::HashMap;
use std::path::Path;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::converter::{ConversionError, DocumentConverter};
use crate::scanner::{ScanVerdict, VirusScanner};

/// Scanner that always returns the same verdict.
pub struct StaticScanner {
    verdict: ScanVerdict,
    calls: AtomicUsize,
}

impl StaticScanner {
    pub fn clean() -> Self {
        Self {
            verdict: ScanVerdict::Clean,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn rejecting(reason: &str) -> Self {
        Self {
            verdict: ScanVerdict::rejected(reason),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VirusScanner for StaticScanner {
    async fn scan(&self, path: &Path) -> ScanVerdict {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(path.exists(), "scanner called without a file on disk");
        self.verdict.clone()
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

#[derive(Debug, Clone, Copy)]
enum ConverterMode {
    Succeed,
    Fail,
    /// Exit cleanly without writing anything.
    Silent,
}

/// Converter that writes a stub PDF next to its input.
pub struct FakeConverter {
    mode: ConverterMode,
    calls: AtomicUsize,
}

impl FakeConverter {
    fn with_mode(mode: ConverterMode) -> Self {
        Self {
            mode,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn succeeding() -> Self {
        Self::with_mode(ConverterMode::Succeed)
    }

    pub fn failing() -> Self {
        Self::with_mode(ConverterMode::Fail)
    }

    pub fn silent() -> Self {
        Self::with_mode(ConverterMode::Silent)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentConverter for FakeConverter {
    async fn convert(&self, input: &Path, out_dir: &Path) -> Result<(), ConversionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.mode {
            ConverterMode::Succeed => {
                let stem = input.file_stem().unwrap_or_default().to_string_lossy();
                let target = out_dir.join(format!("{}.pdf", stem));
                tokio::fs::write(target, b"%PDF-1.7\n%fake\n").await?;
                Ok(())
            }
            ConverterMode::Fail => Err(ConversionError::Io(std::io::Error::other(
                "conversion refused",
            ))),
            ConverterMode::Silent => Ok(()),
        }
    }
}

/// Storage that keeps objects in a map.
pub struct MemoryStorage {
    base_url: String,
    objects: Mutex<HashMap<String, Vec<u8>>>,
    uploads: AtomicUsize,
    fail: bool,
}

impl MemoryStorage {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            objects: Mutex::new(HashMap::new()),
            uploads: AtomicUsize::new(0),
            fail: false,
        }
    }

    /// Storage whose every upload fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new("https://unreachable.example")
        }
    }

    pub fn uploads(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    pub fn object(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn upload_stream(
        &self,
        key: &str,
        _content_type: &str,
        _content_length: Option<u64>,
        mut reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<String> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(StorageError::UploadFailed("access denied".to_string()));
        }

        let mut data = Vec::new();
        reader.read_to_end(&mut data).await?;
        self.objects.lock().unwrap().insert(key.to_string(), data);
        Ok(self.public_url(key))
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
