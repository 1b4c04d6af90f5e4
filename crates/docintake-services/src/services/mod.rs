#[cfg(feature = "clamav")]
pub mod clamav;
pub mod clamdscan;

use docintake_core::{Config, ScannerBackend};
use docintake_processing::VirusScanner;
use std::sync::Arc;

#[cfg(feature = "clamav")]
pub use clamav::ClamAVService;
pub use clamdscan::ClamdscanScanner;

/// Build the configured malware scanner.
pub fn create_scanner(config: &Config) -> anyhow::Result<Arc<dyn VirusScanner>> {
    match config.scanner_backend() {
        ScannerBackend::Clamdscan => Ok(Arc::new(ClamdscanScanner::new(
            config.clamdscan_path(),
            config.clamdscan_args().to_vec(),
            config.scan_timeout(),
        ))),
        #[cfg(feature = "clamav")]
        ScannerBackend::Clamd => Ok(Arc::new(ClamAVService::new(
            config.clamav_host().to_string(),
            config.clamav_port(),
            config.scan_timeout(),
        ))),
        #[cfg(not(feature = "clamav"))]
        ScannerBackend::Clamd => Err(anyhow::anyhow!(
            "clamd scanner not available (clamav feature not enabled)"
        )),
    }
}
