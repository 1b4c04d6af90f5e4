//! Configuration module
//!
//! Settings are read once at startup from the process environment (with an
//! optional `.env` file) and validated before the server binds.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::storage_types::{ScannerBackend, StorageBackend};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 1_572_864;
const DEFAULT_MAX_REQUEST_BODY_MB: u64 = 25;
const DEFAULT_ALLOWED_EXTENSIONS: &str = "pdf,doc,docx,odt,rtf,wps,wpd";
const DEFAULT_CLAMAV_PORT: u16 = 3310;
const MIN_SECRET_LEN: usize = 32;

/// Base configuration for the HTTP process
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub environment: String,
    pub max_request_body_bytes: usize,
    pub log_format: String,
}

/// Document intake configuration
#[derive(Clone)]
pub struct IntakeConfig {
    pub base: BaseConfig,
    // Storage configuration
    pub storage_backend: Option<StorageBackend>,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // DigitalOcean Spaces, MinIO, ...
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Validation policy
    pub max_file_size_bytes: u64,
    pub allowed_extensions: Vec<String>,
    // Malware scanning
    pub scanner_backend: ScannerBackend,
    pub clamdscan_path: String,
    pub clamdscan_args: Vec<String>,
    pub clamav_host: String,
    pub clamav_port: u16,
    pub scan_timeout: Option<Duration>,
    // Conversion
    pub libreoffice_path: String,
    pub convert_timeout: Option<Duration>,
    // Scratch storage; None means the system temp dir
    pub scratch_dir: Option<PathBuf>,
    pub token_signing_secret: String,
}

impl std::fmt::Debug for IntakeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntakeConfig")
            .field("base", &self.base)
            .field("storage_backend", &self.storage_backend)
            .field("s3_bucket", &self.s3_bucket)
            .field("s3_region", &self.s3_region)
            .field("s3_endpoint", &self.s3_endpoint)
            .field("local_storage_path", &self.local_storage_path)
            .field("max_file_size_bytes", &self.max_file_size_bytes)
            .field("allowed_extensions", &self.allowed_extensions)
            .field("scanner_backend", &self.scanner_backend)
            .field("scan_timeout", &self.scan_timeout)
            .field("convert_timeout", &self.convert_timeout)
            .field("scratch_dir", &self.scratch_dir)
            .finish_non_exhaustive()
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<IntakeConfig>);

impl Config {
    fn as_intake(&self) -> &IntakeConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let environment = self.as_intake().base.environment.to_lowercase();
        environment == "production" || environment == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = IntakeConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_intake().validate()
    }

    // Convenience getters for common fields
    pub fn server_port(&self) -> u16 {
        self.as_intake().base.server_port
    }

    pub fn environment(&self) -> &str {
        &self.as_intake().base.environment
    }

    pub fn max_request_body_bytes(&self) -> usize {
        self.as_intake().base.max_request_body_bytes
    }

    pub fn log_format(&self) -> &str {
        &self.as_intake().base.log_format
    }

    pub fn storage_backend(&self) -> Option<StorageBackend> {
        self.as_intake().storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.as_intake().s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.as_intake().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.as_intake().s3_endpoint.as_deref()
    }

    pub fn aws_access_key_id(&self) -> Option<&str> {
        self.as_intake().aws_access_key_id.as_deref()
    }

    pub fn aws_secret_access_key(&self) -> Option<&str> {
        self.as_intake().aws_secret_access_key.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.as_intake().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.as_intake().local_storage_base_url.as_deref()
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.as_intake().max_file_size_bytes
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.as_intake().allowed_extensions
    }

    pub fn scanner_backend(&self) -> ScannerBackend {
        self.as_intake().scanner_backend
    }

    pub fn clamdscan_path(&self) -> &str {
        &self.as_intake().clamdscan_path
    }

    pub fn clamdscan_args(&self) -> &[String] {
        &self.as_intake().clamdscan_args
    }

    pub fn clamav_host(&self) -> &str {
        &self.as_intake().clamav_host
    }

    pub fn clamav_port(&self) -> u16 {
        self.as_intake().clamav_port
    }

    pub fn scan_timeout(&self) -> Option<Duration> {
        self.as_intake().scan_timeout
    }

    pub fn libreoffice_path(&self) -> &str {
        &self.as_intake().libreoffice_path
    }

    pub fn convert_timeout(&self) -> Option<Duration> {
        self.as_intake().convert_timeout
    }

    pub fn scratch_dir(&self) -> Option<&PathBuf> {
        self.as_intake().scratch_dir.as_ref()
    }

    pub fn token_signing_secret(&self) -> &str {
        &self.as_intake().token_signing_secret
    }
}

/// First variable in `names` that is set and non-empty.
fn env_any(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| env::var(name).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

fn env_timeout(name: &str) -> Result<Option<Duration>, anyhow::Error> {
    match env_any(&[name]) {
        None => Ok(None),
        Some(raw) => {
            let secs: u64 = raw
                .parse()
                .map_err(|_| anyhow::anyhow!("{} must be a whole number of seconds", name))?;
            if secs == 0 {
                Ok(None)
            } else {
                Ok(Some(Duration::from_secs(secs)))
            }
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_start_matches('.').to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

impl IntakeConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_process_env()
    }

    /// Build from the current process environment without consulting `.env`.
    pub fn from_process_env() -> Result<Self, anyhow::Error> {
        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let max_request_body_mb = env::var("MAX_REQUEST_BODY_MB")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_MAX_REQUEST_BODY_MB);
        let max_request_body_bytes = max_request_body_mb
            .checked_mul(1024 * 1024)
            .and_then(|bytes| usize::try_from(bytes).ok())
            .ok_or_else(|| {
                anyhow::anyhow!("MAX_REQUEST_BODY_MB is too large: {}", max_request_body_mb)
            })?;

        let base = BaseConfig {
            server_port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            environment,
            max_request_body_bytes,
            log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string()),
        };

        let storage_backend = env_any(&["STORAGE_BACKEND"])
            .map(|s| s.parse::<StorageBackend>())
            .transpose()?;

        let scanner_backend = env_any(&["SCANNER_BACKEND"])
            .map(|s| s.parse::<ScannerBackend>())
            .transpose()?
            .unwrap_or(ScannerBackend::Clamdscan);

        let max_file_size_bytes = match env_any(&["MAX_FILE_SIZE_BYTES"]) {
            Some(raw) => raw
                .parse()
                .map_err(|_| anyhow::anyhow!("MAX_FILE_SIZE_BYTES must be a byte count"))?,
            None => DEFAULT_MAX_FILE_SIZE_BYTES,
        };

        let token_signing_secret = env_any(&["TOKEN_SIGNING_SECRET", "DO_SECRET_KEY_DO_FUNCTIONS"])
            .ok_or_else(|| {
                anyhow::anyhow!("TOKEN_SIGNING_SECRET or DO_SECRET_KEY_DO_FUNCTIONS must be set")
            })?;

        Ok(IntakeConfig {
            base,
            storage_backend,
            s3_bucket: env_any(&["S3_BUCKET", "DO_SPACES_BUCKET_NAME"]),
            s3_region: env_any(&["S3_REGION", "DO_SPACES_REGION", "AWS_REGION"]),
            s3_endpoint: env_any(&["S3_ENDPOINT", "DO_SPACES_ENDPOINT"]),
            aws_access_key_id: env_any(&["AWS_ACCESS_KEY_ID", "DO_SPACES_ACCESS_KEY"]),
            aws_secret_access_key: env_any(&["AWS_SECRET_ACCESS_KEY", "DO_SPACES_SECRET_KEY"]),
            local_storage_path: env_any(&["LOCAL_STORAGE_PATH"]),
            local_storage_base_url: env_any(&["LOCAL_STORAGE_BASE_URL"]),
            max_file_size_bytes,
            allowed_extensions: split_list(
                &env::var("ALLOWED_EXTENSIONS")
                    .unwrap_or_else(|_| DEFAULT_ALLOWED_EXTENSIONS.to_string()),
            ),
            scanner_backend,
            clamdscan_path: env::var("CLAMDSCAN_PATH").unwrap_or_else(|_| "clamdscan".to_string()),
            clamdscan_args: env::var("CLAMDSCAN_ARGS")
                .map(|v| v.split_whitespace().map(String::from).collect())
                .unwrap_or_default(),
            clamav_host: env::var("CLAMAV_HOST").unwrap_or_else(|_| "localhost".to_string()),
            clamav_port: env::var("CLAMAV_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CLAMAV_PORT),
            scan_timeout: env_timeout("SCAN_TIMEOUT_SECS")?,
            libreoffice_path: env::var("LIBREOFFICE_PATH")
                .unwrap_or_else(|_| "libreoffice".to_string()),
            convert_timeout: env_timeout("CONVERT_TIMEOUT_SECS")?,
            scratch_dir: env_any(&["SCRATCH_DIR"]).map(PathBuf::from),
            token_signing_secret,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.token_signing_secret.len() < MIN_SECRET_LEN {
            return Err(anyhow::anyhow!(
                "TOKEN_SIGNING_SECRET must be at least {} characters long",
                MIN_SECRET_LEN
            ));
        }

        if self.allowed_extensions.is_empty() {
            return Err(anyhow::anyhow!("ALLOWED_EXTENSIONS must not be empty"));
        }

        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_BYTES must be greater than zero"));
        }

        // An upload at the ceiling must still fit through the body limit.
        if self.base.max_request_body_bytes as u64 <= self.max_file_size_bytes {
            return Err(anyhow::anyhow!(
                "MAX_REQUEST_BODY_MB must exceed MAX_FILE_SIZE_BYTES ({} bytes)",
                self.max_file_size_bytes
            ));
        }

        let backend = self.storage_backend.unwrap_or(StorageBackend::S3);
        match backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }
}
