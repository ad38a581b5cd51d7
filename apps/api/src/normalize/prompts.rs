// Normalizer LLM prompt templates.
// All prompts for the normalize module are defined here.

pub const CV_EXTRACT_SYSTEM: &str = "\
You are a precise CV data extractor. \
Parse the full text of a candidate CV into structured JSON. \
You MUST respond with valid JSON only — no markdown fences, no explanations. \
Copy content verbatim — never summarize, never invent.";

/// Extraction prompt. Replace `{cv_text}` before sending.
///
/// The instruction itself is in French, matching the CVs this service is fed;
/// field names are the wire contract of `models::record`.
pub const CV_EXTRACT_PROMPT: &str = r#"Extrais TOUT le contenu du CV ci-dessous en JSON. Ne résume rien, copie tout tel quel.

CV:
{cv_text}

Format JSON attendu (COMPLÈTE AVANT D'ARRÊTER):
{
  "titre_professionnel": "Titre professionnel (ex: Business Analyste Salesforce)",
  "diplomes": [{"annee": "2020", "diplome": "...", "etablissement": "..."}],
  "certifications": [{"annee": "2021", "nom": "...", "organisme": "..."}],
  "competences_groups": [{"categorie": "...", "competences": ["..."]}],
  "langues": [{"langue": "...", "niveau": "..."}],
  "experiences": [{
    "entreprise": "...",
    "periode": "...",
    "poste": "...",
    "lieu": "...",
    "projets": ["..."],
    "realisations": ["..."],
    "environnement": ["..."]
  }]
}

RÈGLES:
- Extrais TOUS les diplômes, TOUTES les certifications, TOUTES les expériences
- Pour chaque expérience: garde le nom réel de l'entreprise et TOUS les bullet points
- Liste TOUTES les technologies mentionnées, groupées par catégorie intelligente
- IMPORTANT: ferme tous les tableaux et objets avant de terminer
- Retourne UNIQUEMENT le JSON valide, pas de texte avant ou après"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_has_the_cv_placeholder() {
        assert!(CV_EXTRACT_PROMPT.contains("{cv_text}"));
    }

    #[test]
    fn test_prompt_names_every_wire_field() {
        for key in [
            "titre_professionnel",
            "diplomes",
            "certifications",
            "competences_groups",
            "langues",
            "experiences",
            "realisations",
            "environnement",
        ] {
            assert!(CV_EXTRACT_PROMPT.contains(key), "missing wire key {key}");
        }
    }
}
