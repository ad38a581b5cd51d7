//! Model-output repair: the response text is untrusted and frequently
//! arrives wrapped in markdown fences or surrounded by prose. Cleaning order:
//! strip fences, slice to the outermost `{…}`, then a tolerant serde parse.
//! Anything that survives all three is a usable record; anything else is a
//! `JsonShapeError` and the caller falls back to heuristic extraction.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::models::record::CvRecord;

/// Placeholder used when no professional title can be inferred.
pub const DEFAULT_TITLE: &str = "Consultant IT";

#[derive(Debug, Error)]
pub enum JsonShapeError {
    #[error("no JSON object found in model output")]
    NoObject,

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Parses cleaned model output into a record.
pub fn parse_record(raw: &str) -> Result<CvRecord, JsonShapeError> {
    let stripped = strip_json_fences(raw);
    let object = slice_json_object(stripped).ok_or(JsonShapeError::NoObject)?;
    let record = serde_json::from_str(object)?;
    Ok(record)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// Slices to the substring between the first `{` and the last `}`, discarding
/// any prose wrapping.
fn slice_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

// Ordered title patterns: a role keyword followed by up to three words.
static TITLE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\bconsultant(?:\s+\w+){1,3}",
        r"(?i)\bdata\s+\w+",
        r"(?i)\bdéveloppeur(?:\s+\w+){1,2}",
        r"(?i)\barchitecte(?:\s+\w+){1,2}",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("invalid title pattern"))
    .collect()
});

/// Fills in `professional_title` when the model left it out: first matching
/// title pattern against the raw CV text, else the fixed placeholder.
pub fn ensure_title(record: &mut CvRecord, raw_text: &str) {
    if record
        .professional_title
        .as_deref()
        .is_some_and(|t| !t.trim().is_empty())
    {
        return;
    }

    let inferred = TITLE_PATTERNS
        .iter()
        .find_map(|pattern| pattern.find(raw_text))
        .map(|m| title_case(m.as_str()));

    if let Some(title) = &inferred {
        debug!("inferred professional title: {title}");
    }
    record.professional_title = Some(inferred.unwrap_or_else(|| DEFAULT_TITLE.to_string()));
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
