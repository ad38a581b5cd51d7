//! Text Extractor — turns an uploaded document into raw text.
//!
//! Dispatch is purely on filename suffix: `.pdf` goes to the per-page PDF
//! reader, `.docx`/`.doc` to the DOCX paragraph reader. Anything else is a
//! `FileFormat` error. Read failures surface as `Extraction` and are
//! terminal for the request — no retries.

mod docx;
mod pdf;

use std::path::Path;

use crate::errors::PipelineError;

pub fn extract(path: &Path) -> Result<String, PipelineError> {
    let suffix = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match suffix.as_str() {
        "pdf" => pdf::extract_text(path),
        "docx" | "doc" => docx::extract_text(path),
        other => Err(PipelineError::FileFormat(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_suffix_is_a_file_format_error() {
        let err = extract(Path::new("/tmp/resume.txt")).unwrap_err();
        assert!(matches!(err, PipelineError::FileFormat(ext) if ext == "txt"));
    }

    #[test]
    fn test_missing_suffix_is_a_file_format_error() {
        let err = extract(Path::new("/tmp/resume")).unwrap_err();
        assert!(matches!(err, PipelineError::FileFormat(ext) if ext.is_empty()));
    }

    #[test]
    fn test_suffix_dispatch_is_case_insensitive() {
        // Wrong content behind a recognized suffix must fail in the reader,
        // not in the dispatcher.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.PDF");
        std::fs::write(&path, b"not a pdf").unwrap();
        let err = extract(&path).unwrap_err();
        assert!(matches!(err, PipelineError::Extraction(_)));
    }
}
