//! PDF text extraction: per-page text joined with newlines, pages that yield
//! no text are skipped.

use std::path::Path;

use crate::errors::PipelineError;

pub fn extract_text(path: &Path) -> Result<String, PipelineError> {
    let pages = pdf_extract::extract_text_by_pages(path)
        .map_err(|e| PipelineError::Extraction(format!("{}: {e}", path.display())))?;

    let text = pages
        .iter()
        .map(|page| page.trim_end())
        .filter(|page| !page.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreadable_file_is_an_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"%PDF-1.4 truncated garbage").unwrap();
        let err = extract_text(&path).unwrap_err();
        assert!(matches!(err, PipelineError::Extraction(_)));
    }

    #[test]
    fn test_missing_file_is_an_extraction_error() {
        let err = extract_text(Path::new("/nonexistent/resume.pdf")).unwrap_err();
        assert!(matches!(err, PipelineError::Extraction(_)));
    }
}
