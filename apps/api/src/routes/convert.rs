//! POST /api/v1/convert — the thin HTTP surface over the pipeline.
//!
//! Multipart fields: `file` (the uploaded CV, required), `style`
//! ("advanced" | "carmine") and `format` ("pdf" | "word"), both optional.
//! Responds with the rendered document bytes and a download filename.

use std::path::{Path, PathBuf};

use axum::{
    extract::{Multipart, State},
    http::header,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::pipeline::{self, Stage};
use crate::render::{self, style::StyleKind, OutputFormat};
use crate::state::AppState;

pub async fn handle_convert(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let mut upload: Option<(String, Bytes)> = None;
    let mut style = StyleKind::default();
    let mut format = OutputFormat::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("cannot read upload: {e}")))?;
                upload = Some((filename, data));
            }
            Some("style") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("cannot read style: {e}")))?;
                style = value.parse().map_err(AppError::Validation)?;
            }
            Some("format") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("cannot read format: {e}")))?;
                format = value.parse().map_err(AppError::Validation)?;
            }
            _ => {}
        }
    }

    let (filename, data) = upload
        .ok_or_else(|| AppError::Validation("missing multipart field 'file'".to_string()))?;

    // Scratch copy of the upload: extraction dispatches on the suffix, so it
    // must survive into the scratch name.
    let scratch = scratch_path(&state.config.output_dir, &filename);
    tokio::fs::write(&scratch, &data)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("cannot stage upload: {e}")))?;

    let output_name = render::timestamped_output_name(format);
    let output = state.config.output_dir.join(&output_name);

    let result = pipeline::run(
        &scratch,
        style,
        format,
        &output,
        &state.normalizer,
        &state.config.assets_dir,
        &log_progress,
    )
    .await;

    tokio::fs::remove_file(&scratch).await.ok();
    let written = result?;

    let bytes = tokio::fs::read(&written)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("cannot read output: {e}")))?;

    let content_type = match format {
        OutputFormat::Pdf => "application/pdf",
        OutputFormat::Word => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
    };

    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{output_name}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

fn log_progress(stage: Stage) {
    info!(percent = stage.percent(), "{}", stage.label());
}

/// Unique scratch name preserving the upload's suffix.
fn scratch_path(dir: &Path, filename: &str) -> PathBuf {
    let suffix = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    let name = if suffix.is_empty() {
        format!("upload_{}", Uuid::new_v4())
    } else {
        format!("upload_{}.{suffix}", Uuid::new_v4())
    };
    dir.join(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scratch_path_keeps_the_suffix() {
        let path = scratch_path(Path::new("/tmp"), "mon cv.PDF");
        assert_eq!(path.extension().unwrap(), "PDF");
        assert!(path.file_name().unwrap().to_str().unwrap().starts_with("upload_"));
    }

    #[test]
    fn test_scratch_path_without_suffix() {
        let path = scratch_path(Path::new("/tmp"), "upload");
        assert!(path.extension().is_none());
    }
}
