//! Canonical CV Record — the single structured entity the whole pipeline
//! operates on.
//!
//! Wire names are the French keys the extraction prompt contracts with the
//! model (`titre_professionnel`, `diplomes`/`annee`/`etablissement`, …).
//! Every sequence field defaults to empty rather than absent, so renderer
//! sections are skipped on emptiness alone. Deserialization is tolerant:
//! model output sometimes carries years as bare numbers, skills as a single
//! comma-joined string, or explicit nulls — all are coerced instead of
//! rejected.

use serde::{Deserialize, Serialize};

/// One education entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diploma {
    #[serde(rename = "annee", default, deserialize_with = "de::lenient_string")]
    pub year: String,
    #[serde(rename = "diplome", default, deserialize_with = "de::lenient_string")]
    pub title: String,
    #[serde(
        rename = "etablissement",
        default,
        deserialize_with = "de::lenient_string"
    )]
    pub institution: String,
}

/// One certification entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Certification {
    #[serde(rename = "annee", default, deserialize_with = "de::lenient_string")]
    pub year: String,
    #[serde(rename = "nom", default, deserialize_with = "de::lenient_string")]
    pub name: String,
    #[serde(rename = "organisme", default, deserialize_with = "de::lenient_string")]
    pub issuer: String,
}

/// A free-form skill category with its skills. Category labels are chosen by
/// the extraction step — an open-ended mapping, not an enum.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillGroup {
    #[serde(rename = "categorie", default, deserialize_with = "de::lenient_string")]
    pub category: String,
    #[serde(
        rename = "competences",
        default,
        deserialize_with = "de::lenient_string_list"
    )]
    pub skills: Vec<String>,
}

/// One spoken-language entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageSkill {
    #[serde(rename = "langue", default, deserialize_with = "de::lenient_string")]
    pub language: String,
    #[serde(rename = "niveau", default, deserialize_with = "de::lenient_string")]
    pub level: String,
}

/// One professional experience entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    #[serde(rename = "entreprise", default, deserialize_with = "de::lenient_string")]
    pub company: String,
    #[serde(rename = "periode", default, deserialize_with = "de::lenient_string")]
    pub period: String,
    #[serde(rename = "poste", default, deserialize_with = "de::lenient_string")]
    pub role: String,
    #[serde(rename = "lieu", default, deserialize_with = "de::lenient_string_opt")]
    pub location: Option<String>,
    #[serde(
        rename = "projets",
        default,
        deserialize_with = "de::lenient_string_list"
    )]
    pub project_notes: Vec<String>,
    #[serde(
        rename = "realisations",
        default,
        deserialize_with = "de::lenient_string_list"
    )]
    pub achievements: Vec<String>,
    #[serde(
        rename = "environnement",
        default,
        deserialize_with = "de::lenient_string_list"
    )]
    pub technical_environment: Vec<String>,
}

/// The canonical record. Created fresh per input document, passed by value
/// through each pipeline stage, never persisted.
///
/// The five identifying fields at the bottom are transient: they may be
/// populated by extraction and are removed by [`crate::anonymize`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CvRecord {
    #[serde(
        rename = "titre_professionnel",
        default,
        deserialize_with = "de::lenient_string_opt"
    )]
    pub professional_title: Option<String>,
    #[serde(rename = "diplomes", default, deserialize_with = "de::lenient_seq")]
    pub diplomas: Vec<Diploma>,
    #[serde(default, deserialize_with = "de::lenient_seq")]
    pub certifications: Vec<Certification>,
    #[serde(
        rename = "competences_groups",
        default,
        deserialize_with = "de::lenient_seq"
    )]
    pub skill_groups: Vec<SkillGroup>,
    #[serde(rename = "langues", default, deserialize_with = "de::lenient_seq")]
    pub languages: Vec<LanguageSkill>,
    #[serde(default, deserialize_with = "de::lenient_seq")]
    pub experiences: Vec<Experience>,

    #[serde(rename = "nom", default, deserialize_with = "de::lenient_string_opt")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_string_opt")]
    pub email: Option<String>,
    #[serde(
        rename = "telephone",
        default,
        deserialize_with = "de::lenient_string_opt"
    )]
    pub phone: Option<String>,
    #[serde(rename = "adresse", default, deserialize_with = "de::lenient_string_opt")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_string_opt")]
    pub photo: Option<String>,
}

mod de {
    //! Lenient field coercions for untrusted model output.

    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn coerce(value: &Value) -> String {
        match value {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => String::new(),
        }
    }

    /// string | number | bool | null → String ("" for null / non-scalars).
    pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(coerce(&value))
    }

    /// string | number | null → Option<String> (None for null and empty).
    pub fn lenient_string_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let s = coerce(&value);
        Ok(if s.is_empty() { None } else { Some(s) })
    }

    /// array | null → Vec<T>. Entries that do not deserialize are dropped
    /// instead of failing the whole record.
    pub fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: serde::de::DeserializeOwned,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
            _ => Vec::new(),
        })
    }

    /// array-of-scalars | single string | null → Vec<String>.
    /// A bare string becomes a one-element list; empty entries are dropped.
    pub fn lenient_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Array(items) => items
                .iter()
                .map(coerce)
                .filter(|s| !s.is_empty())
                .collect(),
            other => {
                let s = coerce(&other);
                if s.is_empty() {
                    vec![]
                } else {
                    vec![s]
                }
            }
        })
    }
}
