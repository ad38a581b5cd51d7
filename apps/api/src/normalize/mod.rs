//! Structured-Record Normalizer — raw text in, canonical record out.
//!
//! Two extraction variants behind one seam: the model-backed primary path
//! and the deterministic heuristic fallback. Which one runs is decided by a
//! capability check at call time (is a model configured? did it produce a
//! usable record?), and a failed primary is absorbed — the failure reason
//! goes to the diagnostic log, never to the caller.

pub mod fallback;
pub mod prompts;
pub mod repair;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::errors::PipelineError;
use crate::llm_client::{LlmClient, LlmError};
use crate::models::record::CvRecord;
use crate::normalize::prompts::{CV_EXTRACT_PROMPT, CV_EXTRACT_SYSTEM};
use crate::normalize::repair::JsonShapeError;

/// Minimum extracted-text length. Guards against blank or unreadable uploads.
pub const MIN_TEXT_LEN: usize = 50;

/// Why a primary extraction attempt produced no usable record.
#[derive(Debug, Error)]
pub enum ExtractorError {
    #[error("model call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("model output unusable: {0}")]
    Shape(#[from] JsonShapeError),
}

/// A structured-record extraction backend.
///
/// Carried as `Arc<dyn RecordExtractor>` so tests can script the primary
/// path without a network.
#[async_trait]
pub trait RecordExtractor: Send + Sync {
    async fn extract(&self, text: &str) -> Result<CvRecord, ExtractorError>;

    /// Short backend name for diagnostics.
    fn backend(&self) -> &'static str;
}

/// Primary path: one model call, then output repair and title inference.
pub struct ModelExtractor {
    llm: LlmClient,
}

impl ModelExtractor {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl RecordExtractor for ModelExtractor {
    async fn extract(&self, text: &str) -> Result<CvRecord, ExtractorError> {
        let prompt = CV_EXTRACT_PROMPT.replace("{cv_text}", text);
        let response = self.llm.call_text(&prompt, CV_EXTRACT_SYSTEM).await?;
        let mut record = repair::parse_record(&response)?;
        repair::ensure_title(&mut record, text);
        Ok(record)
    }

    fn backend(&self) -> &'static str {
        "model"
    }
}

/// The normalizer. Constructed once at startup with an explicit (optional)
/// model client — no ambient global configuration.
pub struct Normalizer {
    primary: Option<Arc<dyn RecordExtractor>>,
}

impl Normalizer {
    pub fn new(llm: Option<LlmClient>) -> Self {
        Self {
            primary: llm.map(|client| {
                Arc::new(ModelExtractor::new(client)) as Arc<dyn RecordExtractor>
            }),
        }
    }

    /// Injects a scripted primary backend. Test seam.
    pub fn with_backend(backend: Arc<dyn RecordExtractor>) -> Self {
        Self {
            primary: Some(backend),
        }
    }

    pub fn has_model(&self) -> bool {
        self.primary.is_some()
    }

    /// `normalize(text) -> CanonicalRecord`.
    ///
    /// Fails only on the minimum-length guard; every primary-path failure is
    /// converted into a heuristic extraction.
    pub async fn normalize(&self, text: &str) -> Result<CvRecord, PipelineError> {
        let chars = text.trim().chars().count();
        if chars < MIN_TEXT_LEN {
            return Err(PipelineError::EmptyInput {
                chars,
                min: MIN_TEXT_LEN,
            });
        }

        let Some(primary) = &self.primary else {
            info!("no model credential configured — using heuristic extraction");
            return Ok(fallback::extract(text));
        };

        match primary.extract(text).await {
            Ok(record) => Ok(record),
            Err(reason) => {
                warn!(
                    backend = primary.backend(),
                    %reason,
                    "primary extraction failed — using heuristic extraction"
                );
                Ok(fallback::extract(text))
            }
        }
    }
}
