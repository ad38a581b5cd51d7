//! DOCX backend — builds the record as a Word document with docx-rs.
//!
//! Word reflows content across pages on its own, so unlike the PDF backend
//! there is no page-capacity failure mode here — which is exactly why the
//! overflow hint tells callers to switch to this format. Header bands are
//! single-row tables with shaded cells; the logo block is the style's text
//! wordmark.

use std::io::Cursor;

use docx_rs::{
    AlignmentType, BreakType, Docx, Paragraph, Run, Shading, ShdType, Table, TableCell, TableRow,
    WidthType,
};

use crate::anonymize::ANONYMOUS_NAME;
use crate::errors::PipelineError;
use crate::models::record::{CvRecord, Experience};
use crate::normalize::repair::DEFAULT_TITLE;
use crate::render::style::StyleSpec;
use crate::render::{environment_line, skills_line, visible_sections, Section};

const WHITE: &str = "FFFFFF";
/// Full usable width in twentieths of a point (dxa).
const CONTENT_DXA: usize = 9640;

pub fn render(record: &CvRecord, style: &StyleSpec) -> Result<Vec<u8>, PipelineError> {
    let mut doc = Docx::new();

    doc = add_logo_block(doc, style);
    doc = add_title_block(doc, style, record);

    let sections = visible_sections(record);
    let mut number = 0u32;

    for section in &sections {
        if *section == Section::Experiences {
            continue;
        }
        number += 1;
        doc = match section {
            Section::Education => add_education(doc, style, record, number),
            Section::Certifications => add_certifications(doc, style, record, number),
            Section::Skills => add_skills(doc, style, record, number),
            Section::Languages => add_languages(doc, style, record, number),
            Section::Experiences => unreachable!(),
        };
    }

    if sections.contains(&Section::Experiences) {
        // Forced page break before the experiences, logo repeated.
        doc = doc.add_paragraph(Paragraph::new().add_run(Run::new().add_break(BreakType::Page)));
        doc = add_logo_block(doc, style);
        number += 1;
        doc = add_section_header(doc, style, number, style.captions.experiences);
        for experience in &record.experiences {
            doc = add_experience(doc, style, experience);
        }
    }

    doc = doc.add_paragraph(
        Paragraph::new().align(AlignmentType::Center).add_run(
            Run::new()
                .add_text(style.footer)
                .size(18)
                .color(style.text_gray.hex()),
        ),
    );

    let mut buf = Cursor::new(Vec::new());
    doc.build()
        .pack(&mut buf)
        .map_err(|e| PipelineError::Render(format!("DOCX pack error: {e}")))?;
    Ok(buf.into_inner())
}

fn add_logo_block(doc: Docx, style: &StyleSpec) -> Docx {
    doc.add_paragraph(
        Paragraph::new().add_run(
            Run::new()
                .add_text(style.wordmark)
                .size(28)
                .bold()
                .color(style.primary.hex()),
        ),
    )
}

fn add_title_block(doc: Docx, style: &StyleSpec, record: &CvRecord) -> Docx {
    let name = record.name.as_deref().unwrap_or(ANONYMOUS_NAME);
    let title = record
        .professional_title
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(DEFAULT_TITLE);

    doc.add_paragraph(
        Paragraph::new().align(AlignmentType::Center).add_run(
            Run::new()
                .add_text(name)
                .size(56)
                .bold()
                .color(style.dark.hex()),
        ),
    )
    .add_paragraph(
        Paragraph::new().align(AlignmentType::Center).add_run(
            Run::new()
                .add_text(title)
                .size(24)
                .color(style.text_gray.hex()),
        ),
    )
    .add_paragraph(Paragraph::new())
}

/// Numbered header band: dark number cell + primary caption cell.
fn add_section_header(doc: Docx, style: &StyleSpec, number: u32, caption: &str) -> Docx {
    let number_cell = TableCell::new()
        .width(700, WidthType::Dxa)
        .shading(shade(&style.dark.hex()))
        .add_paragraph(
            Paragraph::new().align(AlignmentType::Center).add_run(
                Run::new()
                    .add_text(number.to_string())
                    .size(32)
                    .bold()
                    .color(WHITE),
            ),
        );
    let caption_cell = TableCell::new()
        .width(CONTENT_DXA - 700, WidthType::Dxa)
        .shading(shade(&style.primary.hex()))
        .add_paragraph(
            Paragraph::new().add_run(Run::new().add_text(caption).size(28).bold().color(WHITE)),
        );

    doc.add_table(
        Table::new(vec![TableRow::new(vec![number_cell, caption_cell])])
            .set_grid(vec![700, CONTENT_DXA - 700]),
    )
    .add_paragraph(Paragraph::new())
}

fn shade(fill: &str) -> Shading {
    Shading::new().shd_type(ShdType::Clear).fill(fill)
}

fn add_education(doc: Docx, style: &StyleSpec, record: &CvRecord, number: u32) -> Docx {
    let mut doc = add_section_header(doc, style, number, style.captions.education);
    for diploma in &record.diplomas {
        doc = doc.add_paragraph(dated_entry(
            &diploma.year,
            &diploma.title,
            &diploma.institution,
            &style.primary.hex(),
            style,
        ));
    }
    doc
}

fn add_certifications(doc: Docx, style: &StyleSpec, record: &CvRecord, number: u32) -> Docx {
    let mut doc = add_section_header(doc, style, number, style.captions.certifications);
    for certification in &record.certifications {
        doc = doc.add_paragraph(dated_entry(
            &certification.year,
            &certification.name,
            &certification.issuer,
            &style.accent.hex(),
            style,
        ));
    }
    doc
}

/// Year emphasized in `year_color`, headline bold, detail de-emphasized.
fn dated_entry(
    year: &str,
    headline: &str,
    detail: &str,
    year_color: &str,
    style: &StyleSpec,
) -> Paragraph {
    let mut paragraph = Paragraph::new().add_run(
        Run::new()
            .add_text(format!("{year}    "))
            .size(24)
            .bold()
            .color(year_color),
    );
    paragraph = paragraph.add_run(
        Run::new()
            .add_text(headline)
            .size(20)
            .bold()
            .color(style.text_dark.hex()),
    );
    if !detail.is_empty() {
        paragraph = paragraph.add_run(
            Run::new()
                .add_text(format!("  —  {detail}"))
                .size(17)
                .color(style.text_gray.hex()),
        );
    }
    paragraph
}

fn add_skills(doc: Docx, style: &StyleSpec, record: &CvRecord, number: u32) -> Docx {
    let mut doc = add_section_header(doc, style, number, style.captions.skills);
    for group in &record.skill_groups {
        if group.skills.is_empty() {
            continue;
        }
        doc = doc.add_paragraph(
            Paragraph::new()
                .add_run(
                    Run::new()
                        .add_text(format!("{} :  ", group.category))
                        .size(20)
                        .bold()
                        .color(style.text_dark.hex()),
                )
                .add_run(
                    Run::new()
                        .add_text(skills_line(group))
                        .size(19)
                        .color(style.text_gray.hex()),
                ),
        );
    }
    doc
}

fn add_languages(doc: Docx, style: &StyleSpec, record: &CvRecord, number: u32) -> Docx {
    let mut doc = add_section_header(doc, style, number, style.captions.languages);
    for language in &record.languages {
        doc = doc.add_paragraph(
            Paragraph::new()
                .add_run(
                    Run::new()
                        .add_text(format!("{} :  ", language.language))
                        .size(20)
                        .bold()
                        .color(style.text_dark.hex()),
                )
                .add_run(
                    Run::new()
                        .add_text(&language.level)
                        .size(19)
                        .color(style.text_gray.hex()),
                ),
        );
    }
    doc
}

fn add_experience(doc: Docx, style: &StyleSpec, experience: &Experience) -> Docx {
    // Header band: company left, period right, on the primary fill.
    let company_cell = TableCell::new()
        .width(CONTENT_DXA * 3 / 5, WidthType::Dxa)
        .shading(shade(&style.primary.hex()))
        .add_paragraph(
            Paragraph::new().add_run(
                Run::new()
                    .add_text(&experience.company)
                    .size(24)
                    .bold()
                    .color(WHITE),
            ),
        );
    let period_cell = TableCell::new()
        .width(CONTENT_DXA * 2 / 5, WidthType::Dxa)
        .shading(shade(&style.primary.hex()))
        .add_paragraph(
            Paragraph::new().align(AlignmentType::Right).add_run(
                Run::new()
                    .add_text(&experience.period)
                    .size(22)
                    .color(WHITE),
            ),
        );
    let mut doc = doc.add_table(
        Table::new(vec![TableRow::new(vec![company_cell, period_cell])])
            .set_grid(vec![CONTENT_DXA * 3 / 5, CONTENT_DXA * 2 / 5]),
    );

    if !experience.role.is_empty() {
        doc = doc.add_paragraph(
            Paragraph::new().add_run(
                Run::new()
                    .add_text(&experience.role)
                    .size(22)
                    .bold()
                    .color(style.text_dark.hex()),
            ),
        );
    }
    if let Some(location) = experience.location.as_deref().filter(|l| !l.is_empty()) {
        doc = doc.add_paragraph(
            Paragraph::new().add_run(
                Run::new()
                    .add_text(location)
                    .size(18)
                    .italic()
                    .color(style.text_gray.hex()),
            ),
        );
    }

    if !experience.project_notes.is_empty() {
        doc = doc.add_paragraph(bold_label("Contexte du projet :", style));
        for note in &experience.project_notes {
            if note.trim().is_empty() {
                continue;
            }
            doc = doc.add_paragraph(body_line(note, style));
        }
    }

    if !experience.achievements.is_empty() {
        doc = doc.add_paragraph(bold_label("Réalisations :", style));
        for achievement in &experience.achievements {
            if achievement.trim().is_empty() {
                continue;
            }
            doc = doc.add_paragraph(body_line(&format!("✓ {achievement}"), style));
        }
    }

    if let Some(env) = environment_line(&experience.technical_environment) {
        doc = doc.add_paragraph(
            Paragraph::new()
                .add_run(
                    Run::new()
                        .add_text("Environnement technique :  ")
                        .size(20)
                        .bold()
                        .color(style.text_dark.hex()),
                )
                .add_run(
                    Run::new()
                        .add_text(env)
                        .size(19)
                        .color(style.text_gray.hex()),
                ),
        );
    }

    doc.add_paragraph(Paragraph::new())
}

fn bold_label(label: &str, style: &StyleSpec) -> Paragraph {
    Paragraph::new().add_run(
        Run::new()
            .add_text(label)
            .size(20)
            .bold()
            .color(style.text_dark.hex()),
    )
}

fn body_line(text: &str, style: &StyleSpec) -> Paragraph {
    Paragraph::new().add_run(
        Run::new()
            .add_text(text)
            .size(19)
            .color(style.text_gray.hex()),
    )
}
