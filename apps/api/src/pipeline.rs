//! Pipeline — Extractor → Normalizer → Anonymizer → Renderer.
//!
//! One document per invocation, stages strictly sequential, no state shared
//! across documents. Callers get discrete, ordered progress notifications
//! and a single terminal success-or-error outcome; there is no mid-pipeline
//! cancellation. CPU/IO-bound stages run inside `tokio::task::spawn_blocking`
//! so an interactive surface stays responsive.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::anonymize::anonymize;
use crate::errors::PipelineError;
use crate::extract;
use crate::normalize::Normalizer;
use crate::render::{self, style::StyleKind, OutputFormat};

/// Pipeline progress, emitted in order, once per stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Extracting,
    Normalizing,
    Anonymizing,
    Rendering,
    Done,
}

impl Stage {
    pub fn percent(&self) -> u8 {
        match self {
            Stage::Extracting => 10,
            Stage::Normalizing => 30,
            Stage::Anonymizing => 60,
            Stage::Rendering => 80,
            Stage::Done => 100,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Stage::Extracting => "Lecture du document…",
            Stage::Normalizing => "Analyse du CV…",
            Stage::Anonymizing => "Anonymisation des données…",
            Stage::Rendering => "Génération du CV anonyme…",
            Stage::Done => "CV généré avec succès",
        }
    }
}

/// Runs the whole pipeline: `pipeline(input_path, style, format) ->
/// output_path | error`. The output path's extension is corrected to the
/// chosen format; the resolved path is returned.
pub async fn run(
    input: &Path,
    style: StyleKind,
    format: OutputFormat,
    output: &Path,
    normalizer: &Normalizer,
    assets_dir: &Path,
    progress: &(dyn Fn(Stage) + Send + Sync),
) -> Result<PathBuf, PipelineError> {
    progress(Stage::Extracting);
    let input_path = input.to_path_buf();
    let text = tokio::task::spawn_blocking(move || extract::extract(&input_path))
        .await
        .map_err(|e| PipelineError::Extraction(format!("extraction task failed: {e}")))??;
    info!(chars = text.chars().count(), "text extracted");

    progress(Stage::Normalizing);
    let record = normalizer.normalize(&text).await?;

    progress(Stage::Anonymizing);
    let record = anonymize(&record);

    progress(Stage::Rendering);
    info!(
        style = style.spec().name,
        format = format.extension(),
        "rendering"
    );
    let output_path = output.to_path_buf();
    let assets = assets_dir.to_path_buf();
    let written = tokio::task::spawn_blocking(move || {
        render::render_to_file(&record, style, format, &output_path, &assets)
    })
    .await
    .map_err(|e| PipelineError::Render(format!("render task failed: {e}")))??;

    progress(Stage::Done);
    info!(output = %written.display(), "pipeline finished");
    Ok(written)
}
