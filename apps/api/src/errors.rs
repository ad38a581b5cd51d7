use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Terminal pipeline failures.
///
/// Model and JSON-shape errors are deliberately absent: the normalizer
/// absorbs them into the fallback extraction path and they never reach a
/// caller (see `normalize`).
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("unsupported file format '{0}' — expected .pdf, .docx or .doc")]
    FileFormat(String),

    #[error("failed to read document: {0}")]
    Extraction(String),

    #[error("extracted text too short ({chars} characters, minimum {min})")]
    EmptyInput { chars: usize, min: usize },

    #[error("render failed: {0}")]
    Render(String),

    /// A single indivisible block was taller than a PDF page. The caller is
    /// expected to suggest the Word output format instead.
    #[error("content does not fit a single PDF page: {0}")]
    PageOverflow(String),
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Pipeline(err) => match err {
                PipelineError::FileFormat(_) => (
                    StatusCode::UNSUPPORTED_MEDIA_TYPE,
                    "UNSUPPORTED_FORMAT",
                    err.to_string(),
                ),
                PipelineError::Extraction(_) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "EXTRACTION_FAILED",
                    err.to_string(),
                ),
                PipelineError::EmptyInput { .. } => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "EMPTY_INPUT",
                    err.to_string(),
                ),
                PipelineError::Render(_) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "RENDER_FAILED",
                    err.to_string(),
                ),
                PipelineError::PageOverflow(_) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "PAGE_OVERFLOW",
                    format!("{err}. Retry with format=word, or trim the input document."),
                ),
            },
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
