//! DOCX text extraction.
//!
//! A `.docx` is a zip archive; the document body lives in
//! `word/document.xml`. Paragraphs (`<w:p>`) map to output lines, and the
//! visible text of a paragraph is the concatenation of its `<w:t>` runs.
//! Legacy `.doc` uploads are routed here too — a genuine binary `.doc` is
//! not a zip and fails as unreadable.

use std::fs::File;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::PipelineError;

static TEXT_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<w:t(?: [^>]*)?>([^<]*)</w:t>").expect("invalid regex"));

pub fn extract_text(path: &Path) -> Result<String, PipelineError> {
    let file = File::open(path)
        .map_err(|e| PipelineError::Extraction(format!("{}: {e}", path.display())))?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| PipelineError::Extraction(format!("{}: not a DOCX archive: {e}", path.display())))?;

    let mut xml = String::new();
    {
        use std::io::Read;
        let mut entry = archive.by_name("word/document.xml").map_err(|e| {
            PipelineError::Extraction(format!("{}: missing document body: {e}", path.display()))
        })?;
        entry
            .read_to_string(&mut xml)
            .map_err(|e| PipelineError::Extraction(format!("{}: {e}", path.display())))?;
    }

    Ok(paragraphs_from_xml(&xml).join("\n"))
}

/// Splits the document XML on paragraph boundaries and collects each
/// paragraph's visible text. Empty paragraphs are kept out of the output.
fn paragraphs_from_xml(xml: &str) -> Vec<String> {
    xml.split("</w:p>")
        .map(paragraph_text)
        .filter(|line| !line.is_empty())
        .collect()
}

fn paragraph_text(paragraph_xml: &str) -> String {
    let mut text = String::new();
    for cap in TEXT_RUN_RE.captures_iter(paragraph_xml) {
        text.push_str(&unescape_xml(&cap[1]));
    }
    text.trim().to_string()
}

fn unescape_xml(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE_BODY: &str = concat!(
        r#"<?xml version="1.0"?><w:document><w:body>"#,
        r#"<w:p><w:r><w:t>Jean Dupont</w:t></w:r></w:p>"#,
        r#"<w:p><w:r><w:t xml:space="preserve">2020 Master "#,
        r#"</w:t></w:r><w:r><w:t>Informatique</w:t></w:r></w:p>"#,
        r#"<w:p/>"#,
        r#"<w:p><w:r><w:t>R&amp;D — Universit&#233; Paris</w:t></w:r></w:p>"#,
        r#"</w:body></w:document>"#
    );

    fn write_docx(dir: &Path, body_xml: &str) -> std::path::PathBuf {
        let path = dir.join("sample.docx");
        let file = File::create(&path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = zip::write::FileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated);
        writer.start_file("word/document.xml", options).unwrap();
        writer.write_all(body_xml.as_bytes()).unwrap();
        writer.finish().unwrap();
        path
    }

    #[test]
    fn test_paragraphs_become_newline_separated_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_docx(dir.path(), SAMPLE_BODY);
        let text = extract_text(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Jean Dupont");
        assert_eq!(lines[1], "2020 Master Informatique");
        assert!(lines[2].starts_with("R&D"));
    }

    #[test]
    fn test_runs_within_a_paragraph_are_concatenated() {
        let text = paragraph_text(r#"<w:r><w:t>Hello </w:t></w:r><w:r><w:t>world</w:t></w:r>"#);
        assert_eq!(text, "Hello world");
    }

    #[test]
    fn test_xml_entities_are_unescaped() {
        assert_eq!(unescape_xml("R&amp;D &lt;core&gt;"), "R&D <core>");
    }

    #[test]
    fn test_non_zip_file_is_an_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.doc");
        std::fs::write(&path, b"\xd0\xcf\x11\xe0 legacy binary").unwrap();
        let err = extract_text(&path).unwrap_err();
        assert!(matches!(err, PipelineError::Extraction(_)));
    }

    #[test]
    fn test_archive_without_document_body_is_an_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.docx");
        let file = File::create(&path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = zip::write::FileOptions::default();
        writer.start_file("word/other.xml", options).unwrap();
        writer.write_all(b"<x/>").unwrap();
        writer.finish().unwrap();

        let err = extract_text(&path).unwrap_err();
        assert!(matches!(err, PipelineError::Extraction(_)));
    }
}
