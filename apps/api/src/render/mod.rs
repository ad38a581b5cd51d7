//! Template Renderer — maps an anonymized record onto a fixed visual layout.
//!
//! `render_to_file(record, style, format, path)` writes the finished document
//! and returns the resolved path (extension corrected to the chosen format).
//! Section planning is shared: a section renders iff its sequence is
//! non-empty, numbering runs across the whole document, and a forced page
//! break (with the logo block repeated) separates the first group of sections
//! from the experiences.

pub mod pdf;
pub mod style;
pub mod word;

use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::errors::PipelineError;
use crate::models::record::{CvRecord, SkillGroup};
use crate::render::style::StyleKind;

/// Separator between skills inside one rendered skill group.
pub const SKILL_SEPARATOR: &str = " • ";

/// Output container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Pdf,
    Word,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Word => "docx",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pdf" => Ok(OutputFormat::Pdf),
            "word" | "docx" => Ok(OutputFormat::Word),
            other => Err(format!(
                "unknown output format '{other}' (expected 'pdf' or 'word')"
            )),
        }
    }
}

/// The record sections, in render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Education,
    Certifications,
    Skills,
    Languages,
    Experiences,
}

/// The sections this record actually renders — a section header is emitted
/// iff its sequence is non-empty. Both backends iterate this plan, so the
/// emptiness rule lives in exactly one place.
pub fn visible_sections(record: &CvRecord) -> Vec<Section> {
    let mut sections = Vec::new();
    if !record.diplomas.is_empty() {
        sections.push(Section::Education);
    }
    if !record.certifications.is_empty() {
        sections.push(Section::Certifications);
    }
    if !record.skill_groups.is_empty() {
        sections.push(Section::Skills);
    }
    if !record.languages.is_empty() {
        sections.push(Section::Languages);
    }
    if !record.experiences.is_empty() {
        sections.push(Section::Experiences);
    }
    sections
}

/// One line of text for a skill group.
pub fn skills_line(group: &SkillGroup) -> String {
    group.skills.join(SKILL_SEPARATOR)
}

/// Joined technical-environment line, `None` when empty.
pub fn environment_line(technical_environment: &[String]) -> Option<String> {
    if technical_environment.is_empty() {
        None
    } else {
        Some(technical_environment.join(SKILL_SEPARATOR))
    }
}

/// Renders to `requested` (its extension corrected to the format) and
/// returns the path actually written.
pub fn render_to_file(
    record: &CvRecord,
    style: StyleKind,
    format: OutputFormat,
    requested: &Path,
    assets_dir: &Path,
) -> Result<PathBuf, PipelineError> {
    let path = requested.with_extension(format.extension());
    let bytes = match format {
        OutputFormat::Pdf => pdf::render(record, style.spec(), assets_dir)?,
        OutputFormat::Word => word::render(record, style.spec())?,
    };
    std::fs::write(&path, &bytes)
        .map_err(|e| PipelineError::Render(format!("cannot write {}: {e}", path.display())))?;
    Ok(path)
}

/// Auto-generated output filename for callers that do not pick one.
pub fn timestamped_output_name(format: OutputFormat) -> String {
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    format!("cv_anonyme_{stamp}.{}", format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::{Diploma, Experience, LanguageSkill};

    #[test]
    fn test_format_parsing_and_extensions() {
        assert_eq!("pdf".parse::<OutputFormat>().unwrap(), OutputFormat::Pdf);
        assert_eq!("Word".parse::<OutputFormat>().unwrap(), OutputFormat::Word);
        assert_eq!("docx".parse::<OutputFormat>().unwrap(), OutputFormat::Word);
        assert!("odt".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Word.extension(), "docx");
    }

    #[test]
    fn test_visible_sections_skips_empty_sequences() {
        let record = CvRecord {
            professional_title: Some("Consultant IT".to_string()),
            ..Default::default()
        };
        assert!(visible_sections(&record).is_empty());

        let record = CvRecord {
            diplomas: vec![Diploma::default()],
            languages: vec![LanguageSkill::default()],
            experiences: vec![Experience::default()],
            ..Default::default()
        };
        assert_eq!(
            visible_sections(&record),
            vec![Section::Education, Section::Languages, Section::Experiences]
        );
    }

    #[test]
    fn test_skills_line_uses_the_configured_separator() {
        let group = SkillGroup {
            category: "Langages".to_string(),
            skills: vec!["Python".to_string(), "Go".to_string()],
        };
        let line = skills_line(&group);
        assert!(line.contains("Python"));
        assert!(line.contains("Go"));
        assert_eq!(line, format!("Python{SKILL_SEPARATOR}Go"));
    }

    #[test]
    fn test_environment_line_none_when_empty() {
        assert!(environment_line(&[]).is_none());
        assert_eq!(
            environment_line(&["Java".to_string(), "Kafka".to_string()]).as_deref(),
            Some("Java • Kafka")
        );
    }

    #[test]
    fn test_render_to_file_corrects_the_extension() {
        let dir = tempfile::tempdir().unwrap();
        let requested = dir.path().join("out.pdf");
        let record = CvRecord::default();
        let path = render_to_file(
            &record,
            StyleKind::Advanced,
            OutputFormat::Word,
            &requested,
            dir.path(),
        )
        .unwrap();
        assert_eq!(path.extension().unwrap(), "docx");
        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_timestamped_name_shape() {
        let name = timestamped_output_name(OutputFormat::Pdf);
        assert!(name.starts_with("cv_anonyme_"));
        assert!(name.ends_with(".pdf"));
    }
}
