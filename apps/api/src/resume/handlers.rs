use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::resume::parse::{run_pipeline, ParseOutcome, Upload, SPAM_WARNING};
use crate::state::AppState;

/// Multipart field carrying the document.
pub const UPLOAD_FIELD: &str = "resume";

/// Content type assumed when the part does not declare one.
const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// POST /api/parse
pub async fn handle_parse(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, AppError> {
    let mut multipart = multipart.map_err(|e| AppError::NoFile(e.body_text()))?;
    let upload = read_upload(&mut multipart).await?;

    let span = info_span!(
        "parse_resume",
        request_id = %Uuid::new_v4(),
        media_type = %upload.media_type,
        bytes = upload.data.len(),
    );
    let outcome = run_pipeline(upload, &state.extractor, state.completer.as_ref())
        .instrument(span)
        .await?;

    Ok(match outcome {
        // Key spelling is part of the published response contract.
        ParseOutcome::Spam => Json(json!({ "spanResume": SPAM_WARNING })).into_response(),
        ParseOutcome::Record(record) => Json(record).into_response(),
    })
}

/// Reads the body and returns its single file part named [`UPLOAD_FIELD`].
/// Plain text fields are ignored; zero files, a second file, or a file under
/// any other name is an error.
async fn read_upload(multipart: &mut Multipart) -> Result<Upload, AppError> {
    let mut upload: Option<Upload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::NoFile(format!("failed to read multipart body: {e}")))?
    {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };

        let name = field.name().unwrap_or_default().to_string();
        if name != UPLOAD_FIELD {
            return Err(AppError::NoFile(format!("unexpected file field '{name}'")));
        }
        if upload.is_some() {
            return Err(AppError::NoFile(format!(
                "more than one '{UPLOAD_FIELD}' file uploaded"
            )));
        }

        let media_type = field
            .content_type()
            .unwrap_or(FALLBACK_MEDIA_TYPE)
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::NoFile(format!("failed to read file data: {e}")))?;

        tracing::debug!(
            "Received file '{}' ({}, {} bytes)",
            file_name,
            media_type,
            data.len()
        );

        upload = Some(Upload {
            data,
            media_type,
            file_name: Some(file_name),
        });
    }

    upload.ok_or_else(|| AppError::NoFile(format!("no '{UPLOAD_FIELD}' file in request")))
}
