use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use docintake_core::AppError;
use docintake_processing::{UploadOutcome, UploadRequest, UploadedFile};
use std::sync::Arc;

const FIELD_SUBMITTER_ID: &str = "userUUID";
const FIELD_FIRST_NAME: &str = "firstName";
const FIELD_LAST_NAME: &str = "lastName";
const FIELD_FILE: &str = "cvFile";

/// Collect the form into an `UploadRequest`. Unknown fields are ignored and
/// exactly one `cvFile` part is accepted.
async fn read_upload_form(mut multipart: Multipart) -> Result<UploadRequest, HttpAppError> {
    let mut request = UploadRequest::default();

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        match field_name.as_str() {
            FIELD_SUBMITTER_ID => request.submitter_id = field.text().await?,
            FIELD_FIRST_NAME => request.first_name = field.text().await?,
            FIELD_LAST_NAME => request.last_name = field.text().await?,
            FIELD_FILE => {
                if request.file.is_some() {
                    return Err(AppError::InvalidInput(format!(
                        "Multiple file fields are not allowed; send exactly one field named '{}'",
                        FIELD_FILE
                    ))
                    .into());
                }
                let filename = field.file_name().map(|s| s.to_string()).unwrap_or_default();
                let data = field.bytes().await?;
                request.file = Some(UploadedFile { filename, data });
            }
            _ => {}
        }
    }

    Ok(request)
}

/// POST /upload
pub async fn upload_document(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadOutcome>, HttpAppError> {
    accept_upload(&state, multipart)
        .await
        .map(Json)
        .map_err(|e| e.with_details(state.expose_error_details))
}

async fn accept_upload(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<UploadOutcome, HttpAppError> {
    let request = read_upload_form(multipart?).await?;

    let outcome = state.pipeline.run(request).await?;

    tracing::info!(file_url = %outcome.file_url, "Document upload completed");
    Ok(outcome)
}
