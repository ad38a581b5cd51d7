//! Heuristic fallback extractor — deterministic, keyword/regex-driven, used
//! whenever the model is unavailable or its output is unusable.
//!
//! Guarantees: never fails, never panics, always returns a record with every
//! key present (possibly empty sequences). Accuracy is best-effort only —
//! line adjacency stands in for real section understanding.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::record::{CvRecord, Diploma, Experience, SkillGroup};

/// Company names are unknown to the heuristic path; every block gets this.
pub const COMPANY_PLACEHOLDER: &str = "ENTREPRISE";

/// Blocks at or under this length are treated as noise, not experiences.
const MIN_EXPERIENCE_BLOCK_LEN: usize = 20;

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(19|20)\d{2}\b").expect("invalid regex"));

/// A line that opens an experience block: a bare year or "word year".
static DATE_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^(?:\d{4}\b|\w+[ \t]+\d{4}\b)").expect("invalid regex"));

static EXPERIENCE_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)exp[ée]rience").expect("invalid regex"));

const EDUCATION_KEYWORDS: &[&str] = &["master", "licence", "diplôme", "école", "université"];

/// Fixed category → pattern table for technology mining.
static TECH_CATEGORIES: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    [
        (
            "Langages",
            r"(?i)\b(?:Java|Python|JavaScript|TypeScript|PHP|Ruby|Go|Rust|Kotlin|Swift|Scala)\b|C\+\+|C#",
        ),
        (
            "Frameworks",
            r"(?i)\b(?:Angular|React|Vue|Spring|Django|Flask|Express|Hibernate|JPA)\b",
        ),
        (
            "Bases de données",
            r"(?i)\b(?:Oracle|MySQL|PostgreSQL|MongoDB|Redis|Cassandra|SQL Server)\b",
        ),
        (
            "Cloud & DevOps",
            r"(?i)\b(?:AWS|Azure|GCP|Kubernetes|Docker|Terraform|Jenkins)\b",
        ),
    ]
    .iter()
    .map(|(category, pattern)| (*category, Regex::new(pattern).expect("invalid regex")))
    .collect()
});

/// Builds a well-formed record from raw text alone. Total function.
pub fn extract(text: &str) -> CvRecord {
    CvRecord {
        diplomas: extract_diplomas(text),
        skill_groups: extract_skill_groups(text),
        experiences: extract_experiences(text),
        ..Default::default()
    }
}

/// A 4-digit year co-occurring with an education keyword opens a diploma
/// entry; the following line is taken as the institution.
fn extract_diplomas(text: &str) -> Vec<Diploma> {
    let lines: Vec<&str> = text.lines().collect();
    let mut diplomas = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        let Some(year) = YEAR_RE.find(line) else {
            continue;
        };
        let lower = line.to_lowercase();
        if !EDUCATION_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
            continue;
        }
        diplomas.push(Diploma {
            year: year.as_str().to_string(),
            title: line.trim().to_string(),
            institution: lines
                .get(i + 1)
                .map(|next| next.trim().to_string())
                .unwrap_or_default(),
        });
    }

    diplomas
}

/// Mines the whole text with the fixed category table. Duplicates collapse
/// case-insensitively; entries come out sorted, original order is not kept.
fn extract_skill_groups(text: &str) -> Vec<SkillGroup> {
    let mut groups = Vec::new();

    for (category, pattern) in TECH_CATEGORIES.iter() {
        // BTreeMap keyed on the lowercased token: set semantics + stable order.
        let mut seen: BTreeMap<String, String> = BTreeMap::new();
        for m in pattern.find_iter(text) {
            seen.entry(m.as_str().to_lowercase())
                .or_insert_with(|| m.as_str().to_string());
        }
        if seen.is_empty() {
            continue;
        }
        groups.push(SkillGroup {
            category: (*category).to_string(),
            skills: seen.into_values().collect(),
        });
    }

    groups
}

/// Splits the text after the last "expérience" marker into blocks that start
/// at date-shaped lines. Every sufficiently long block becomes one experience
/// whose achievements are literally the block's lines.
fn extract_experiences(text: &str) -> Vec<Experience> {
    let Some(marker) = EXPERIENCE_MARKER_RE.find_iter(text).last() else {
        return Vec::new();
    };
    let section = &text[marker.end()..];

    split_on_date_lines(section)
        .into_iter()
        .filter(|block| block.trim().len() > MIN_EXPERIENCE_BLOCK_LEN)
        .map(|block| {
            let block = block.trim();
            Experience {
                company: COMPANY_PLACEHOLDER.to_string(),
                project_notes: vec![block.to_string()],
                achievements: block
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string)
                    .collect(),
                ..Default::default()
            }
        })
        .collect()
}

/// Splits at the start of every date-shaped line, keeping the opening line
/// with its block. The chunk before the first date line is a block too.
fn split_on_date_lines(section: &str) -> Vec<&str> {
    let starts: Vec<usize> = DATE_LINE_RE.find_iter(section).map(|m| m.start()).collect();
    if starts.is_empty() {
        return vec![section];
    }

    let mut blocks = Vec::with_capacity(starts.len() + 1);
    if starts[0] > 0 {
        blocks.push(&section[..starts[0]]);
    }
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(section.len());
        blocks.push(&section[start..end]);
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documented_diploma_example() {
        // No "expérience" marker: one diploma, zero experiences.
        let record = extract("2020 Master Informatique\nUniversité Paris\n");
        assert_eq!(record.diplomas.len(), 1);
        assert_eq!(record.diplomas[0].year, "2020");
        assert_eq!(record.diplomas[0].title, "2020 Master Informatique");
        assert_eq!(record.diplomas[0].institution, "Université Paris");
        assert!(record.experiences.is_empty());
    }

    #[test]
    fn test_diploma_on_last_line_has_empty_institution() {
        let record = extract("2018 Licence Mathématiques");
        assert_eq!(record.diplomas.len(), 1);
        assert_eq!(record.diplomas[0].institution, "");
    }

    #[test]
    fn test_year_without_education_keyword_is_not_a_diploma() {
        let record = extract("2020 Refonte du portail client\nParis");
        assert!(record.diplomas.is_empty());
    }

    #[test]
    fn test_skills_are_grouped_deduplicated_and_sorted() {
        let record = extract("Java, python, JAVA, Spring et PostgreSQL sur AWS. Python aussi.");
        let languages = record
            .skill_groups
            .iter()
            .find(|g| g.category == "Langages")
            .unwrap();
        assert_eq!(languages.skills, vec!["Java", "python"]);
        assert!(record.skill_groups.iter().any(|g| g.category == "Frameworks"));
        assert!(record
            .skill_groups
            .iter()
            .any(|g| g.category == "Bases de données"));
        assert!(record
            .skill_groups
            .iter()
            .any(|g| g.category == "Cloud & DevOps"));
    }

    #[test]
    fn test_empty_categories_are_omitted() {
        let record = extract("Uniquement du texte sans aucune technologie connue.");
        assert!(record.skill_groups.is_empty());
    }

    #[test]
    fn test_experiences_split_on_date_shaped_lines() {
        let text = "EXPÉRIENCES PROFESSIONNELLES\n\
                    Janvier 2021\n\
                    Mission de refonte du système de facturation\n\
                    Mise en place des pipelines de déploiement\n\
                    2019\n\
                    Développement d'un portail client pour une banque\n";
        let record = extract(text);
        assert_eq!(record.experiences.len(), 2);
        let first = &record.experiences[0];
        assert_eq!(first.company, COMPANY_PLACEHOLDER);
        assert!(first.achievements.iter().any(|l| l.contains("facturation")));
        assert!(record.experiences[1]
            .achievements
            .iter()
            .any(|l| l.contains("portail client")));
    }

    #[test]
    fn test_short_blocks_are_dropped() {
        let text = "Expérience\n2020\ncourt\n";
        let record = extract(text);
        assert!(record.experiences.is_empty());
    }

    #[test]
    fn test_total_on_arbitrary_text() {
        // Shape guarantee: all keys present, nothing panics.
        for text in [
            "",
            "a",
            "\n\n\n",
            "{}{}[]``` 2020 2021 2022 éàç",
            "expérience expérience expérience",
            &"x".repeat(10_000),
        ] {
            let record = extract(text);
            assert!(record.professional_title.is_none());
            // Sequence fields exist (possibly empty) by construction.
            let _ = (
                &record.diplomas,
                &record.certifications,
                &record.skill_groups,
                &record.languages,
                &record.experiences,
            );
        }
    }
}
