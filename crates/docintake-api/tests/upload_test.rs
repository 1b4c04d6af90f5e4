mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use docintake_processing::test_helpers::{FakeConverter, MemoryStorage, StaticScanner};
use docintake_processing::TokenIssuer;
use helpers::{
    identity_form, setup_production_app, setup_test_app, setup_test_app_with_storage, upload_form,
};
use std::sync::Arc;

fn error_of(body: &serde_json::Value) -> &str {
    body.get("error")
        .and_then(|v| v.as_str())
        .expect("Expected 'error' in response")
}

#[tokio::test]
async fn test_upload_pdf_success() {
    let app = setup_test_app(StaticScanner::clean(), FakeConverter::succeeding()).await;
    let pdf = vec![b'%'; 500 * 1024];

    let response = app
        .client()
        .post("/upload")
        .multipart(upload_form("resume.pdf", pdf.clone()))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    let file_url = body["file_url"].as_str().unwrap();
    let file_path = body["file_path"].as_str().unwrap();
    let token = body["token"].as_str().unwrap();

    let key = file_url.rsplit('/').next().unwrap();
    assert!(file_url.starts_with(helpers::FILES_BASE_URL));
    assert!(key.starts_with("Ada-Lovelace-"));
    assert!(key.ends_with(".pdf"));
    assert!(file_path.ends_with(key));
    assert_eq!(token.len(), 64);
    assert!(TokenIssuer::new(helpers::TEST_SECRET).verify(
        helpers::TEST_USER_UUID,
        file_path,
        file_url,
        token
    ));

    assert_eq!(app.converter.calls(), 0);
    assert_eq!(app.stored_files(), vec![key.to_string()]);
    let stored = std::fs::read(app.storage_dir.path().join(key)).unwrap();
    assert_eq!(stored, pdf);
    assert!(app.scratch_is_empty());
}

#[tokio::test]
async fn test_upload_docx_is_converted() {
    let app = setup_test_app(StaticScanner::clean(), FakeConverter::succeeding()).await;

    let response = app
        .client()
        .post("/upload")
        .multipart(upload_form("resume.docx", b"PK\x03\x04 docx".to_vec()))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert!(body["file_url"].as_str().unwrap().ends_with(".pdf"));
    assert_eq!(app.converter.calls(), 1);
    assert!(app.scratch_is_empty());
}

#[tokio::test]
async fn test_upload_disallowed_extension() {
    let app = setup_test_app(StaticScanner::clean(), FakeConverter::succeeding()).await;

    let response = app
        .client()
        .post("/upload")
        .multipart(upload_form("resume.exe", b"MZ".to_vec()))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(error_of(&body), "File type not allowed");
    assert_eq!(body["code"], "FILE_TYPE_NOT_ALLOWED");
    assert_eq!(app.scanner.calls(), 0);
    assert!(app.scratch_is_empty());
    assert!(app.stored_files().is_empty());
}

#[tokio::test]
async fn test_upload_oversize_file() {
    let app = setup_test_app(StaticScanner::clean(), FakeConverter::succeeding()).await;

    let response = app
        .client()
        .post("/upload")
        .multipart(upload_form("resume.pdf", vec![0u8; 2 * 1024 * 1024]))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(error_of(&body), "File size exceeds limit");
    assert_eq!(app.scanner.calls(), 0);
    assert!(app.scratch_is_empty());
}

#[tokio::test]
async fn test_upload_above_body_limit_is_oversize() {
    let app = setup_test_app(StaticScanner::clean(), FakeConverter::succeeding()).await;

    // Larger than the 25 MiB request body cap, not just the file ceiling.
    let response = app
        .client()
        .post("/upload")
        .multipart(upload_form("resume.pdf", vec![0u8; 26 * 1024 * 1024]))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(error_of(&body), "File size exceeds limit");
    assert_eq!(body["code"], "FILE_TOO_LARGE");
    assert_eq!(app.scanner.calls(), 0);
    assert!(app.stored_files().is_empty());
}

#[tokio::test]
async fn test_error_details_outside_production() {
    let app = setup_test_app(StaticScanner::clean(), FakeConverter::succeeding()).await;

    let response = app
        .client()
        .post("/upload")
        .multipart(upload_form("resume.exe", b"MZ".to_vec()))
        .await;

    let body: serde_json::Value = response.json();
    assert_eq!(body["details"], "File type not allowed: exe");
}

#[tokio::test]
async fn test_error_details_hidden_in_production() {
    let app = setup_production_app(StaticScanner::clean(), FakeConverter::succeeding()).await;

    let response = app
        .client()
        .post("/upload")
        .multipart(upload_form("resume.exe", b"MZ".to_vec()))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(error_of(&body), "File type not allowed");
    assert!(body.get("details").is_none());
    assert!(body.get("error_type").is_none());
}

#[tokio::test]
async fn test_upload_dot_pdf_filename_accepted() {
    let app = setup_test_app(StaticScanner::clean(), FakeConverter::succeeding()).await;

    let response = app
        .client()
        .post("/upload")
        .multipart(upload_form(".pdf", b"%PDF".to_vec()))
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(app.converter.calls(), 0);
}

#[tokio::test]
async fn test_upload_infected_file() {
    let app = setup_test_app(
        StaticScanner::rejecting("Eicar-Test-Signature FOUND"),
        FakeConverter::succeeding(),
    )
    .await;

    let response = app
        .client()
        .post("/upload")
        .multipart(upload_form("resume.pdf", b"X5O!P%@AP[4\\PZX54(P^)7CC)7}".to_vec()))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(error_of(&body), "File might be infected");
    // scanner output never reaches the client
    assert!(body.get("details").is_none());
    assert!(app.stored_files().is_empty());
    assert!(app.scratch_is_empty());
}

#[tokio::test]
async fn test_upload_conversion_failure() {
    let app = setup_test_app(StaticScanner::clean(), FakeConverter::failing()).await;

    let response = app
        .client()
        .post("/upload")
        .multipart(upload_form("resume.docx", b"PK".to_vec()))
        .await;

    assert_eq!(response.status_code(), 500);
    let body: serde_json::Value = response.json();
    assert_eq!(error_of(&body), "Failed to convert file to PDF");
    assert_eq!(body["code"], "CONVERSION_FAILED");
    assert!(app.stored_files().is_empty());
    assert!(app.scratch_is_empty());
}

#[tokio::test]
async fn test_upload_storage_failure() {
    let storage_dir = tempfile::tempdir().unwrap();
    let app = setup_test_app_with_storage(
        StaticScanner::clean(),
        FakeConverter::succeeding(),
        Arc::new(MemoryStorage::failing()),
        storage_dir,
    );

    let response = app
        .client()
        .post("/upload")
        .multipart(upload_form("resume.pdf", b"%PDF".to_vec()))
        .await;

    assert_eq!(response.status_code(), 500);
    let body: serde_json::Value = response.json();
    assert_eq!(error_of(&body), "Failed to upload file to S3");
    assert!(body.get("token").is_none());
    assert!(app.scratch_is_empty());
}

#[tokio::test]
async fn test_upload_missing_identity_fields() {
    let app = setup_test_app(StaticScanner::clean(), FakeConverter::succeeding()).await;

    let form = MultipartForm::new()
        .add_text("userUUID", helpers::TEST_USER_UUID)
        .add_text("firstName", "Ada")
        .add_part(
            "cvFile",
            Part::bytes(bytes::Bytes::from_static(b"%PDF")).file_name("resume.pdf"),
        );
    let response = app.client().post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(
        error_of(&body),
        "User UUID, First Name, and Last Name are required"
    );
    assert_eq!(app.scanner.calls(), 0);
}

#[tokio::test]
async fn test_upload_missing_file_part() {
    let app = setup_test_app(StaticScanner::clean(), FakeConverter::succeeding()).await;

    let response = app
        .client()
        .post("/upload")
        .multipart(identity_form())
        .await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(error_of(&body), "No file part");
}

#[tokio::test]
async fn test_upload_empty_filename() {
    let app = setup_test_app(StaticScanner::clean(), FakeConverter::succeeding()).await;

    let response = app
        .client()
        .post("/upload")
        .multipart(upload_form("", b"%PDF".to_vec()))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(error_of(&body), "No selected file");
}

#[tokio::test]
async fn test_upload_rejects_second_file_part() {
    let app = setup_test_app(StaticScanner::clean(), FakeConverter::succeeding()).await;

    let form = upload_form("resume.pdf", b"%PDF".to_vec()).add_part(
        "cvFile",
        Part::bytes(bytes::Bytes::from_static(b"%PDF")).file_name("other.pdf"),
    );
    let response = app.client().post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
    assert!(app.stored_files().is_empty());
}

#[tokio::test]
async fn test_upload_requires_multipart_body() {
    let app = setup_test_app(StaticScanner::clean(), FakeConverter::succeeding()).await;

    let response = app
        .client()
        .post("/upload")
        .json(&serde_json::json!({"userUUID": helpers::TEST_USER_UUID}))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_health_and_request_id() {
    let app = setup_test_app(StaticScanner::clean(), FakeConverter::succeeding()).await;

    let response = app
        .client()
        .get("/health")
        .add_header("X-Request-ID", "req-123")
        .await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(response.header("X-Request-ID"), "req-123");
}
