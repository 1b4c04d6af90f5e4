//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p docintake-api`.

#![allow(dead_code)]

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use docintake_api::setup::{routes, services::upload_policy};
use docintake_api::state::AppState;
use docintake_core::{BaseConfig, Config, IntakeConfig, ScannerBackend, StorageBackend};
use docintake_processing::test_helpers::{FakeConverter, StaticScanner};
use docintake_processing::{TokenIssuer, UploadPipeline};
use docintake_storage::{LocalStorage, Storage};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

pub const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";
pub const TEST_USER_UUID: &str = "5f0c7a52-6a4e-4a0b-9d7c-1f1e8f0f9a11";
pub const FILES_BASE_URL: &str = "http://localhost:8080/files";

pub fn test_config(scratch_dir: &Path, storage_dir: &Path, environment: &str) -> Config {
    Config(Box::new(IntakeConfig {
        base: BaseConfig {
            server_port: 0,
            environment: environment.to_string(),
            max_request_body_bytes: 25 * 1024 * 1024,
            log_format: "text".to_string(),
        },
        storage_backend: Some(StorageBackend::Local),
        s3_bucket: None,
        s3_region: None,
        s3_endpoint: None,
        aws_access_key_id: None,
        aws_secret_access_key: None,
        local_storage_path: Some(storage_dir.display().to_string()),
        local_storage_base_url: Some(FILES_BASE_URL.to_string()),
        max_file_size_bytes: 1_572_864,
        allowed_extensions: ["pdf", "doc", "docx", "odt", "rtf", "wps", "wpd"]
            .iter()
            .map(|e| e.to_string())
            .collect(),
        scanner_backend: ScannerBackend::Clamdscan,
        clamdscan_path: "clamdscan".to_string(),
        clamdscan_args: Vec::new(),
        clamav_host: "localhost".to_string(),
        clamav_port: 3310,
        scan_timeout: None,
        libreoffice_path: "libreoffice".to_string(),
        convert_timeout: None,
        scratch_dir: Some(scratch_dir.to_path_buf()),
        token_signing_secret: TEST_SECRET.to_string(),
    }))
}

/// Test application: server plus the fakes and directories behind it.
pub struct TestApp {
    pub server: TestServer,
    pub scanner: Arc<StaticScanner>,
    pub converter: Arc<FakeConverter>,
    pub scratch_dir: TempDir,
    pub storage_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Names of the objects written to local storage.
    pub fn stored_files(&self) -> Vec<String> {
        std::fs::read_dir(self.storage_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }

    pub fn scratch_is_empty(&self) -> bool {
        std::fs::read_dir(self.scratch_dir.path())
            .unwrap()
            .next()
            .is_none()
    }
}

/// App backed by local storage in a temp dir.
pub async fn setup_test_app(scanner: StaticScanner, converter: FakeConverter) -> TestApp {
    let storage_dir = tempfile::tempdir().expect("Failed to create storage dir");
    let storage = LocalStorage::new(storage_dir.path(), FILES_BASE_URL.to_string())
        .await
        .expect("Failed to create local storage");
    setup_test_app_with_storage(scanner, converter, Arc::new(storage), storage_dir)
}

/// App configured as a production deployment.
pub async fn setup_production_app(scanner: StaticScanner, converter: FakeConverter) -> TestApp {
    let storage_dir = tempfile::tempdir().expect("Failed to create storage dir");
    let storage = LocalStorage::new(storage_dir.path(), FILES_BASE_URL.to_string())
        .await
        .expect("Failed to create local storage");
    build_test_app(scanner, converter, Arc::new(storage), storage_dir, "production")
}

pub fn setup_test_app_with_storage(
    scanner: StaticScanner,
    converter: FakeConverter,
    storage: Arc<dyn Storage>,
    storage_dir: TempDir,
) -> TestApp {
    build_test_app(scanner, converter, storage, storage_dir, "test")
}

fn build_test_app(
    scanner: StaticScanner,
    converter: FakeConverter,
    storage: Arc<dyn Storage>,
    storage_dir: TempDir,
    environment: &str,
) -> TestApp {
    let scratch_dir = tempfile::tempdir().expect("Failed to create scratch dir");
    let config = test_config(scratch_dir.path(), storage_dir.path(), environment);

    let scanner = Arc::new(scanner);
    let converter = Arc::new(converter);
    let pipeline = UploadPipeline::new(
        upload_policy(&config),
        scanner.clone(),
        converter.clone(),
        storage,
        TokenIssuer::new(config.token_signing_secret()),
    );
    let state = Arc::new(AppState::new(&config, pipeline));
    let app = routes::setup_routes(&config, state);

    let server =
        TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        scanner,
        converter,
        scratch_dir,
        storage_dir,
    }
}

/// Complete upload form with a single `cvFile` part.
pub fn upload_form(filename: &str, data: Vec<u8>) -> MultipartForm {
    identity_form().add_part(
        "cvFile",
        Part::bytes(bytes::Bytes::from(data))
            .file_name(filename)
            .mime_type("application/octet-stream"),
    )
}

/// The three identity fields without any file part.
pub fn identity_form() -> MultipartForm {
    MultipartForm::new()
        .add_text("userUUID", TEST_USER_UUID)
        .add_text("firstName", "Ada")
        .add_text("lastName", "Lovelace")
}
