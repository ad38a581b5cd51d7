//! PDF backend — draws the record onto A4 pages with printpdf.
//!
//! Layout is a top-down y-cursor over builtin Helvetica faces. Section
//! headers are filled bands; entries advance the cursor by their measured
//! height, breaking to a new page when the bottom margin is reached. A
//! single indivisible block taller than one page cannot be placed at all —
//! that is the `PageOverflow` case the caller turns into a "use the Word
//! format" hint.

use std::fs;
use std::io::BufWriter;
use std::path::Path;

use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Rect, Rgb,
};
use tracing::debug;

use crate::anonymize::ANONYMOUS_NAME;
use crate::errors::PipelineError;
use crate::models::record::{Certification, CvRecord, Diploma, Experience};
use crate::normalize::repair::DEFAULT_TITLE;
use crate::render::style::{StyleSpec, Tint};
use crate::render::{environment_line, skills_line, visible_sections, Section};

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN_LEFT: f32 = 18.0;
const MARGIN_TOP: f32 = 15.0;
const MARGIN_BOTTOM: f32 = 18.0;
const CONTENT_W: f32 = PAGE_W - 2.0 * MARGIN_LEFT;
/// Tallest block a page can hold.
const MAX_BLOCK_H: f32 = PAGE_H - MARGIN_TOP - MARGIN_BOTTOM;

const LINE_H: f32 = 4.5;
const SMALL_LINE_H: f32 = 4.0;
const BAND_H: f32 = 10.0;
/// Character budget for body text wrapped across the content width.
const BODY_WRAP: usize = 88;

pub fn render(
    record: &CvRecord,
    style: &StyleSpec,
    assets_dir: &Path,
) -> Result<Vec<u8>, PipelineError> {
    let mut renderer = PdfRenderer::new(style, assets_dir)?;

    renderer.logo_block();
    renderer.title_block(record);

    let sections = visible_sections(record);
    let mut number = 0u32;

    for section in &sections {
        if *section == Section::Experiences {
            continue;
        }
        number += 1;
        match section {
            Section::Education => renderer.education(number, record)?,
            Section::Certifications => renderer.certifications(number, record)?,
            Section::Skills => renderer.skills(number, record)?,
            Section::Languages => renderer.languages(number, record)?,
            Section::Experiences => unreachable!(),
        }
    }

    if sections.contains(&Section::Experiences) {
        // Forced page break: experiences always open a fresh page, with the
        // logo block repeated.
        renderer.new_page();
        renderer.logo_block();
        number += 1;
        renderer.section_header(number, style.captions.experiences)?;
        for experience in &record.experiences {
            renderer.experience(experience)?;
        }
    }

    renderer.footer();
    renderer.finish()
}

struct PdfRenderer<'a> {
    style: &'a StyleSpec,
    assets_dir: &'a Path,
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
    y: f32,
}

impl<'a> PdfRenderer<'a> {
    fn new(style: &'a StyleSpec, assets_dir: &'a Path) -> Result<Self, PipelineError> {
        let (doc, page, layer) =
            PdfDocument::new("CV anonyme", Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
        let layer = doc.get_page(page).get_layer(layer);
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| PipelineError::Render(format!("PDF font error: {e}")))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| PipelineError::Render(format!("PDF font error: {e}")))?;
        let italic = doc
            .add_builtin_font(BuiltinFont::HelveticaOblique)
            .map_err(|e| PipelineError::Render(format!("PDF font error: {e}")))?;

        Ok(Self {
            style,
            assets_dir,
            doc,
            layer,
            regular,
            bold,
            italic,
            y: PAGE_H - MARGIN_TOP,
        })
    }

    fn finish(self) -> Result<Vec<u8>, PipelineError> {
        let mut buf = BufWriter::new(Vec::new());
        self.doc
            .save(&mut buf)
            .map_err(|e| PipelineError::Render(format!("PDF save error: {e}")))?;
        buf.into_inner()
            .map_err(|e| PipelineError::Render(format!("PDF buffer error: {e}")))
    }

    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_H - MARGIN_TOP;
    }

    /// Breaks to a new page when `needed` millimetres no longer fit.
    fn ensure_room(&mut self, needed: f32) {
        if self.y - needed < MARGIN_BOTTOM {
            self.new_page();
        }
    }

    /// Rejects blocks that no page could ever hold.
    fn check_block(&self, height: f32, what: &str) -> Result<(), PipelineError> {
        if height > MAX_BLOCK_H {
            return Err(PipelineError::PageOverflow(format!(
                "{what} needs {height:.0}mm, a page holds {MAX_BLOCK_H:.0}mm"
            )));
        }
        Ok(())
    }

    fn fill(&self, tint: Tint) {
        let (r, g, b) = tint.unit();
        self.layer.set_fill_color(Color::Rgb(Rgb::new(r, g, b, None)));
    }

    fn text(&self, s: &str, size: f32, x: f32, tint: Tint, font: &IndirectFontRef) {
        self.fill(tint);
        self.layer.use_text(s, size, Mm(x), Mm(self.y), font);
    }

    fn text_centered(&self, s: &str, size: f32, tint: Tint, font: &IndirectFontRef) {
        // Approximate centering from an average glyph width of 0.5em.
        let width_mm = s.chars().count() as f32 * size * 0.5 * 0.3528;
        let x = ((PAGE_W - width_mm) / 2.0).max(MARGIN_LEFT);
        self.text(s, size, x, tint, font);
    }

    fn band(&self, x: f32, width: f32, height: f32, tint: Tint) {
        self.fill(tint);
        let rect = Rect::new(
            Mm(x),
            Mm(self.y - height),
            Mm(x + width),
            Mm(self.y),
        )
        .with_mode(PaintMode::Fill);
        self.layer.add_rect(rect);
    }

    // ── Shared blocks ───────────────────────────────────────────────────────

    /// Logo image if a candidate decodes, text wordmark otherwise. Never an
    /// error: missing assets degrade silently.
    fn logo_block(&mut self) {
        for candidate in self.style.logo_candidates {
            let path = self.assets_dir.join(candidate);
            match load_logo(&path) {
                Some(image) => {
                    debug!("logo loaded from {}", path.display());
                    image.add_to_layer(
                        self.layer.clone(),
                        ImageTransform {
                            translate_x: Some(Mm(MARGIN_LEFT)),
                            translate_y: Some(Mm(self.y - 16.0)),
                            dpi: Some(300.0),
                            ..Default::default()
                        },
                    );
                    self.y -= 20.0;
                    return;
                }
                None => continue,
            }
        }

        self.text(self.style.wordmark, 14.0, MARGIN_LEFT, self.style.primary, &self.bold);
        self.y -= 10.0;
    }

    fn title_block(&mut self, record: &CvRecord) {
        self.y -= 8.0;
        let name = record.name.as_deref().unwrap_or(ANONYMOUS_NAME);
        self.text_centered(name, 24.0, self.style.dark, &self.bold);
        self.y -= 9.0;
        let title = record
            .professional_title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(DEFAULT_TITLE);
        self.text_centered(title, 12.0, self.style.text_gray, &self.regular);
        self.y -= 10.0;
    }

    /// Numbered section header: dark number cell + primary caption band.
    fn section_header(&mut self, number: u32, caption: &str) -> Result<(), PipelineError> {
        self.ensure_room(BAND_H + 6.0);
        self.band(MARGIN_LEFT, 12.0, BAND_H, self.style.dark);
        self.band(MARGIN_LEFT + 12.0, CONTENT_W - 12.0, BAND_H, self.style.primary);
        let white = Tint::new(0xff, 0xff, 0xff);
        let y_before = self.y;
        self.y -= 7.0; // baseline inside the band
        self.text(&number.to_string(), 14.0, MARGIN_LEFT + 4.5, white, &self.bold);
        self.text(caption, 13.0, MARGIN_LEFT + 16.0, white, &self.bold);
        self.y = y_before - BAND_H - 4.0;
        Ok(())
    }

    // ── Sections ────────────────────────────────────────────────────────────

    fn education(&mut self, number: u32, record: &CvRecord) -> Result<(), PipelineError> {
        self.section_header(number, self.style.captions.education)?;
        for diploma in &record.diplomas {
            self.dated_entry_block(diploma_cells(diploma), self.style.primary)?;
        }
        self.y -= 2.0;
        Ok(())
    }

    fn certifications(&mut self, number: u32, record: &CvRecord) -> Result<(), PipelineError> {
        self.section_header(number, self.style.captions.certifications)?;
        for certification in &record.certifications {
            self.dated_entry_block(certification_cells(certification), self.style.accent)?;
        }
        self.y -= 2.0;
        Ok(())
    }

    /// Year + headline + de-emphasized detail line, shared by diplomas and
    /// certifications (only the year highlight differs).
    fn dated_entry_block(
        &mut self,
        (year, headline, detail): (String, String, String),
        year_tint: Tint,
    ) -> Result<(), PipelineError> {
        let headline_lines = wrap_text(&headline, BODY_WRAP - 12);
        let height = (headline_lines.len() as f32).max(1.0) * LINE_H
            + if detail.is_empty() { 0.0 } else { SMALL_LINE_H }
            + 3.0;
        self.check_block(height, "entry")?;
        self.ensure_room(height);

        if !is_blank_year(&year) {
            self.text(&year, 12.0, MARGIN_LEFT + 2.0, year_tint, &self.bold);
        }
        for line in &headline_lines {
            self.text(line, 10.0, MARGIN_LEFT + 26.0, self.style.text_dark, &self.bold);
            self.y -= LINE_H;
        }
        if !detail.is_empty() {
            self.text(&detail, 8.5, MARGIN_LEFT + 26.0, self.style.text_gray, &self.regular);
            self.y -= SMALL_LINE_H;
        }
        self.y -= 3.0;
        Ok(())
    }

    fn skills(&mut self, number: u32, record: &CvRecord) -> Result<(), PipelineError> {
        self.section_header(number, self.style.captions.skills)?;
        for group in &record.skill_groups {
            if group.skills.is_empty() {
                continue;
            }
            let lines = wrap_text(&skills_line(group), BODY_WRAP - 28);
            let height = lines.len() as f32 * LINE_H + 3.0;
            self.check_block(height, "skill group")?;
            self.ensure_room(height);

            self.text(&group.category, 10.0, MARGIN_LEFT + 2.0, self.style.text_dark, &self.bold);
            for line in &lines {
                self.text(line, 9.5, MARGIN_LEFT + 52.0, self.style.text_gray, &self.regular);
                self.y -= LINE_H;
            }
            self.y -= 3.0;
        }
        self.y -= 2.0;
        Ok(())
    }

    fn languages(&mut self, number: u32, record: &CvRecord) -> Result<(), PipelineError> {
        self.section_header(number, self.style.captions.languages)?;
        for language in &record.languages {
            self.ensure_room(LINE_H + 2.0);
            self.text(&language.language, 10.0, MARGIN_LEFT + 2.0, self.style.text_dark, &self.bold);
            self.text(&language.level, 9.5, MARGIN_LEFT + 52.0, self.style.text_gray, &self.regular);
            self.y -= LINE_H + 2.0;
        }
        self.y -= 2.0;
        Ok(())
    }

    fn experience(&mut self, experience: &Experience) -> Result<(), PipelineError> {
        let body = experience_body_lines(experience);
        let height = 8.0 + body.len() as f32 * LINE_H + 6.0;
        self.check_block(height, "experience block")?;
        self.ensure_room(height.min(60.0));

        // Header band: company left, period right.
        self.band(MARGIN_LEFT, CONTENT_W, 8.0, self.style.primary);
        let white = Tint::new(0xff, 0xff, 0xff);
        let y_before = self.y;
        self.y -= 5.5;
        self.text(&experience.company, 11.0, MARGIN_LEFT + 4.0, white, &self.bold);
        if !experience.period.is_empty() {
            let period_w = experience.period.chars().count() as f32 * 10.0 * 0.5 * 0.3528;
            let x = PAGE_W - MARGIN_LEFT - 4.0 - period_w;
            self.text(&experience.period, 10.0, x, white, &self.regular);
        }
        self.y = y_before - 8.0 - 3.0;

        for line in &body {
            self.ensure_room(LINE_H);
            let font = match line.emphasis {
                Emphasis::Bold => self.bold.clone(),
                Emphasis::Italic => self.italic.clone(),
                Emphasis::Plain => self.regular.clone(),
            };
            let tint = match line.emphasis {
                Emphasis::Bold => self.style.text_dark,
                _ => self.style.text_gray,
            };
            self.text(&line.text, line.size, MARGIN_LEFT + line.indent, tint, &font);
            self.y -= LINE_H;
        }
        self.y -= 6.0;
        Ok(())
    }

    fn footer(&mut self) {
        self.ensure_room(12.0);
        self.y -= 8.0;
        self.text_centered(self.style.footer, 9.0, self.style.text_gray, &self.regular);
    }
}

// ── Entry shaping ───────────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq)]
enum Emphasis {
    Plain,
    Bold,
    Italic,
}

struct BodyLine {
    text: String,
    size: f32,
    indent: f32,
    emphasis: Emphasis,
}

impl BodyLine {
    fn plain(text: String, indent: f32) -> Self {
        Self {
            text,
            size: 9.5,
            indent,
            emphasis: Emphasis::Plain,
        }
    }

    fn bold(text: String) -> Self {
        Self {
            text,
            size: 10.0,
            indent: 2.0,
            emphasis: Emphasis::Bold,
        }
    }
}

/// Flattens the conditional parts of one experience into drawable lines.
fn experience_body_lines(experience: &Experience) -> Vec<BodyLine> {
    let mut lines = Vec::new();

    if !experience.role.is_empty() {
        lines.push(BodyLine {
            text: experience.role.clone(),
            size: 10.5,
            indent: 2.0,
            emphasis: Emphasis::Bold,
        });
    }
    if let Some(location) = experience.location.as_deref().filter(|l| !l.is_empty()) {
        lines.push(BodyLine {
            text: location.to_string(),
            size: 9.0,
            indent: 2.0,
            emphasis: Emphasis::Italic,
        });
    }

    if !experience.project_notes.is_empty() {
        lines.push(BodyLine::bold("Projets :".to_string()));
        for note in &experience.project_notes {
            for wrapped in wrap_text(note, BODY_WRAP) {
                lines.push(BodyLine::plain(wrapped, 4.0));
            }
        }
    }

    if !experience.achievements.is_empty() {
        lines.push(BodyLine::bold("Réalisations :".to_string()));
        for achievement in &experience.achievements {
            let mut first = true;
            for wrapped in wrap_text(achievement, BODY_WRAP - 4) {
                let text = if first {
                    format!("• {wrapped}")
                } else {
                    format!("  {wrapped}")
                };
                first = false;
                lines.push(BodyLine::plain(text, 6.0));
            }
        }
    }

    if let Some(env) = environment_line(&experience.technical_environment) {
        lines.push(BodyLine::bold("Environnement technique :".to_string()));
        for wrapped in wrap_text(&env, BODY_WRAP) {
            lines.push(BodyLine::plain(wrapped, 4.0));
        }
    }

    lines
}

fn diploma_cells(diploma: &Diploma) -> (String, String, String) {
    (
        diploma.year.clone(),
        diploma.title.clone(),
        diploma.institution.clone(),
    )
}

fn certification_cells(certification: &Certification) -> (String, String, String) {
    (
        certification.year.clone(),
        certification.name.clone(),
        certification.issuer.clone(),
    )
}

/// Model output sometimes spells out missing years instead of omitting them.
fn is_blank_year(year: &str) -> bool {
    let lower = year.trim().to_lowercase();
    lower.is_empty() || lower == "none" || lower == "null" || lower == "non spécifié"
}

/// Greedy word wrap on a character budget.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty()
            && current.chars().count() + 1 + word.chars().count() > max_chars
        {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn load_logo(path: &Path) -> Option<Image> {
    let bytes = fs::read(path).ok()?;
    let cursor = std::io::Cursor::new(bytes);
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "png" => printpdf::image_crate::codecs::png::PngDecoder::new(cursor)
            .ok()
            .and_then(|decoder| Image::try_from(decoder).ok()),
        "jpg" | "jpeg" => printpdf::image_crate::codecs::jpeg::JpegDecoder::new(cursor)
            .ok()
            .and_then(|decoder| Image::try_from(decoder).ok()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::{LanguageSkill, SkillGroup};
    use crate::render::style::StyleKind;

    fn sample_record() -> CvRecord {
        CvRecord {
            professional_title: Some("Consultant IT".to_string()),
            diplomas: vec![Diploma {
                year: "2020".to_string(),
                title: "Master Informatique".to_string(),
                institution: "Université Paris".to_string(),
            }],
            certifications: vec![Certification {
                year: "2021".to_string(),
                name: "AWS Solutions Architect".to_string(),
                issuer: "Amazon".to_string(),
            }],
            skill_groups: vec![SkillGroup {
                category: "Langages".to_string(),
                skills: vec!["Python".to_string(), "Go".to_string()],
            }],
            languages: vec![LanguageSkill {
                language: "Français".to_string(),
                level: "Natif".to_string(),
            }],
            experiences: vec![Experience {
                company: "ACME Conseil".to_string(),
                period: "2020 - 2023".to_string(),
                role: "Développeur".to_string(),
                location: Some("Lyon".to_string()),
                project_notes: vec!["Refonte du SI".to_string()],
                achievements: vec!["Migration vers le cloud".to_string()],
                technical_environment: vec!["Java".to_string(), "Kubernetes".to_string()],
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_full_record_renders_to_pdf_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let bytes = render(&sample_record(), StyleKind::Advanced.spec(), dir.path()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn test_empty_record_renders_title_only() {
        let dir = tempfile::tempdir().unwrap();
        let record = CvRecord {
            professional_title: Some("Consultant IT".to_string()),
            ..Default::default()
        };
        let bytes = render(&record, StyleKind::Carmine.spec(), dir.path()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_oversized_experience_block_is_a_page_overflow() {
        let dir = tempfile::tempdir().unwrap();
        let mut record = sample_record();
        record.experiences[0].achievements = (0..400)
            .map(|i| format!("Réalisation numéro {i} avec un certain niveau de détail"))
            .collect();
        let err = render(&record, StyleKind::Advanced.spec(), dir.path()).unwrap_err();
        assert!(matches!(err, PipelineError::PageOverflow(_)));
    }

    #[test]
    fn test_many_small_blocks_paginate_instead_of_overflowing() {
        let dir = tempfile::tempdir().unwrap();
        let mut record = sample_record();
        let one = record.experiences[0].clone();
        record.experiences = (0..40).map(|_| one.clone()).collect();
        assert!(render(&record, StyleKind::Advanced.spec(), dir.path()).is_ok());
    }

    #[test]
    fn test_missing_logo_degrades_to_wordmark() {
        // Assets dir exists but holds no candidate file.
        let dir = tempfile::tempdir().unwrap();
        assert!(render(&sample_record(), StyleKind::Advanced.spec(), dir.path()).is_ok());
        // And a nonexistent dir is just as fine.
        assert!(render(
            &sample_record(),
            StyleKind::Advanced.spec(),
            Path::new("/nonexistent/assets")
        )
        .is_ok());
    }

    #[test]
    fn test_wrap_text_budget() {
        let lines = wrap_text("alpha beta gamma delta", 11);
        assert_eq!(lines, vec!["alpha beta", "gamma delta"]);
        assert!(wrap_text("", 10).is_empty());
    }

    #[test]
    fn test_blank_year_detection() {
        assert!(is_blank_year(""));
        assert!(is_blank_year("None"));
        assert!(is_blank_year("non spécifié"));
        assert!(!is_blank_year("2020"));
    }

    #[test]
    fn test_experience_body_lines_are_conditional() {
        let lines = experience_body_lines(&Experience {
            company: "ACME".to_string(),
            ..Default::default()
        });
        assert!(lines.is_empty());

        let lines = experience_body_lines(&sample_record().experiences[0]);
        assert!(lines.iter().any(|l| l.text == "Développeur"));
        assert!(lines.iter().any(|l| l.text.contains("Réalisations")));
        assert!(lines.iter().any(|l| l.text.contains("Java • Kubernetes")));
    }
}
