use std::time::Duration;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extract::ExtractError;
use crate::llm_client::LlmError;
use crate::resume::schema::Violation;

/// Body text for every failed parse. Callers never see the underlying cause.
pub const GENERIC_FAILURE_MESSAGE: &str = "Insert proper resume, Valid resume required";

pub const RATE_LIMIT_MESSAGE: &str = "Too many requests, please try again later.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Variants stay distinct so logs record the real failure; the response body
/// is the same for all upload, extraction and completion errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("No file uploaded: {0}")]
    NoFile(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("Text extraction failed: {0}")]
    Extraction(ExtractError),

    #[error("Completion service error: {0}")]
    Upstream(#[from] LlmError),

    #[error("Completion is not valid JSON: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    #[error("Completion failed schema validation ({} violations)", .0.len())]
    SchemaViolation(Vec<Violation>),

    #[error("Rate limit exceeded, retry in {}s", .retry_after.as_secs())]
    RateLimited { retry_after: Duration },
}

impl From<ExtractError> for AppError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::UnsupportedType(media_type) => AppError::UnsupportedType(media_type),
            other => AppError::Extraction(other),
        }
    }
}

impl AppError {
    /// Stable label for logs.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NoFile(_) => "NO_FILE",
            AppError::UnsupportedType(_) => "UNSUPPORTED_TYPE",
            AppError::Extraction(_) => "EXTRACTION_ERROR",
            AppError::Upstream(LlmError::Decode(_)) => "UPSTREAM_DECODE_ERROR",
            AppError::Upstream(_) => "UPSTREAM_ERROR",
            AppError::MalformedResponse(_) => "MALFORMED_RESPONSE",
            AppError::SchemaViolation(_) => "SCHEMA_VIOLATION",
            AppError::RateLimited { .. } => "RATE_LIMITED",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::RateLimited { retry_after } => {
                // Round up so clients never retry inside the window.
                let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    [(header::RETRY_AFTER, secs.max(1).to_string())],
                    Json(json!({ "error": RATE_LIMIT_MESSAGE })),
                )
                    .into_response()
            }
            AppError::SchemaViolation(violations) => {
                tracing::error!(
                    code = "SCHEMA_VIOLATION",
                    count = violations.len(),
                    "Completion rejected: {violations:?}"
                );
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({
                        "error": GENERIC_FAILURE_MESSAGE,
                        "violations": violations,
                    })),
                )
                    .into_response()
            }
            other => {
                tracing::error!(code = other.code(), "Parse failed: {other}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": GENERIC_FAILURE_MESSAGE })),
                )
                    .into_response()
            }
        }
    }
}
