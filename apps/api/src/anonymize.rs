//! Anonymizer — nulls exactly the identifying fields, keeps everything else.
//!
//! Scope is deliberately narrow: real company names, locations, project
//! details and dates all stay. Total function over any valid record, and
//! idempotent.

use crate::models::record::CvRecord;

/// Placeholder shown in place of the candidate's name.
pub const ANONYMOUS_NAME: &str = "Nom & Prénom";

pub fn anonymize(record: &CvRecord) -> CvRecord {
    let mut anonymized = record.clone();
    anonymized.name = Some(ANONYMOUS_NAME.to_string());
    anonymized.email = None;
    anonymized.phone = None;
    anonymized.address = None;
    anonymized.photo = None;
    anonymized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::{Diploma, Experience};

    fn sample_record() -> CvRecord {
        CvRecord {
            professional_title: Some("Consultant IT".to_string()),
            name: Some("Jean Dupont".to_string()),
            email: Some("jean.dupont@example.com".to_string()),
            phone: Some("+33 6 12 34 56 78".to_string()),
            address: Some("12 rue de la Paix, Paris".to_string()),
            photo: Some("photo.png".to_string()),
            diplomas: vec![Diploma {
                year: "2020".to_string(),
                title: "Master Informatique".to_string(),
                institution: "Université Paris".to_string(),
            }],
            experiences: vec![Experience {
                company: "ACME Conseil".to_string(),
                period: "2020 - 2023".to_string(),
                role: "Développeur".to_string(),
                location: Some("Lyon".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_nulls_exactly_the_identifying_fields() {
        let anonymized = anonymize(&sample_record());
        assert_eq!(anonymized.name.as_deref(), Some(ANONYMOUS_NAME));
        assert!(anonymized.email.is_none());
        assert!(anonymized.phone.is_none());
        assert!(anonymized.address.is_none());
        assert!(anonymized.photo.is_none());
    }

    #[test]
    fn test_everything_else_is_untouched() {
        let original = sample_record();
        let anonymized = anonymize(&original);
        assert_eq!(anonymized.professional_title, original.professional_title);
        assert_eq!(anonymized.diplomas, original.diplomas);
        assert_eq!(anonymized.certifications, original.certifications);
        assert_eq!(anonymized.skill_groups, original.skill_groups);
        assert_eq!(anonymized.languages, original.languages);
        // Company and location are kept.
        assert_eq!(anonymized.experiences[0].company, "ACME Conseil");
        assert_eq!(anonymized.experiences[0].location.as_deref(), Some("Lyon"));
    }

    #[test]
    fn test_idempotent() {
        let once = anonymize(&sample_record());
        let twice = anonymize(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_total_over_already_null_fields() {
        let anonymized = anonymize(&CvRecord::default());
        assert_eq!(anonymized.name.as_deref(), Some(ANONYMOUS_NAME));
        assert!(anonymized.email.is_none());
    }
}
