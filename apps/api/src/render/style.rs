//! Style descriptors — the only thing that differs between visual themes.
//!
//! One renderer, parameterized: a style contributes a palette, section
//! captions, a text wordmark, a footer line and logo candidates. Structure
//! and ordering are identical across styles.

use std::str::FromStr;

/// An sRGB color, stored as bytes; converted per backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tint {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Tint {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Unit-range channels for the PDF backend.
    pub fn unit(&self) -> (f32, f32, f32) {
        (
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        )
    }

    /// Uppercase hex without `#`, as DOCX shading wants it.
    pub fn hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Section captions, in render order.
#[derive(Debug, Clone, Copy)]
pub struct Captions {
    pub education: &'static str,
    pub certifications: &'static str,
    pub skills: &'static str,
    pub languages: &'static str,
    pub experiences: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct StyleSpec {
    pub name: &'static str,
    /// Section header bands and experience header rows.
    pub primary: Tint,
    /// Title text and the numbered cell of section headers.
    pub dark: Tint,
    /// Entry box borders and label cells.
    pub light: Tint,
    /// Certification year highlight.
    pub accent: Tint,
    pub text_dark: Tint,
    pub text_gray: Tint,
    pub captions: Captions,
    /// Text fallback when no logo image is available.
    pub wordmark: &'static str,
    pub footer: &'static str,
    /// Logo image filenames probed under the assets directory, in order.
    pub logo_candidates: &'static [&'static str],
}

static ADVANCED: StyleSpec = StyleSpec {
    name: "advanced",
    primary: Tint::new(0x1a, 0x36, 0x5d),
    dark: Tint::new(0x0f, 0x28, 0x47),
    light: Tint::new(0xe6, 0xf2, 0xff),
    accent: Tint::new(0x10, 0xb9, 0x81),
    text_dark: Tint::new(0x1f, 0x29, 0x37),
    text_gray: Tint::new(0x6b, 0x72, 0x80),
    captions: Captions {
        education: "FORMATION",
        certifications: "CERTIFICATIONS",
        skills: "COMPÉTENCES TECHNIQUES",
        languages: "LANGUES",
        experiences: "EXPÉRIENCES PROFESSIONNELLES",
    },
    wordmark: "CABINET CONSEIL",
    footer: "Profil anonymisé — diffusion restreinte",
    logo_candidates: &["logo_advanced.png", "logo_advanced.jpg", "logo.png"],
};

static CARMINE: StyleSpec = StyleSpec {
    name: "carmine",
    primary: Tint::new(0xc4, 0x1e, 0x3a),
    dark: Tint::new(0x8b, 0x1a, 0x2e),
    light: Tint::new(0xff, 0xe6, 0xea),
    accent: Tint::new(0xd9, 0x77, 0x06),
    text_dark: Tint::new(0x1f, 0x29, 0x37),
    text_gray: Tint::new(0x6b, 0x72, 0x80),
    captions: Captions {
        education: "FORMATIONS",
        certifications: "CERTIFICATIONS",
        skills: "COMPÉTENCES FONCTIONNELLES & TECHNIQUES",
        languages: "LANGUES",
        experiences: "EXPÉRIENCES PROFESSIONNELLES",
    },
    wordmark: "CONSEIL & EXPERTISE",
    footer: "Profil anonymisé — document confidentiel",
    logo_candidates: &["logo_carmine.png", "logo_carmine.jpg", "logo.png"],
};

/// The available visual themes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StyleKind {
    #[default]
    Advanced,
    Carmine,
}

impl StyleKind {
    pub fn spec(&self) -> &'static StyleSpec {
        match self {
            StyleKind::Advanced => &ADVANCED,
            StyleKind::Carmine => &CARMINE,
        }
    }
}

impl FromStr for StyleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "advanced" => Ok(StyleKind::Advanced),
            "carmine" => Ok(StyleKind::Carmine),
            other => Err(format!(
                "unknown style '{other}' (expected 'advanced' or 'carmine')"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_parsing() {
        assert_eq!("advanced".parse::<StyleKind>().unwrap(), StyleKind::Advanced);
        assert_eq!(" Carmine ".parse::<StyleKind>().unwrap(), StyleKind::Carmine);
        assert!("gothic".parse::<StyleKind>().is_err());
    }

    #[test]
    fn test_default_style_is_advanced() {
        assert_eq!(StyleKind::default(), StyleKind::Advanced);
    }

    #[test]
    fn test_tint_hex_is_uppercase_without_hash() {
        assert_eq!(Tint::new(0x1a, 0x36, 0x5d).hex(), "1A365D");
    }

    #[test]
    fn test_tint_unit_range() {
        let (r, g, b) = Tint::new(255, 0, 128).unit();
        assert!((r - 1.0).abs() < 1e-6);
        assert_eq!(g, 0.0);
        assert!(b > 0.49 && b < 0.51);
    }

    #[test]
    fn test_styles_differ_only_in_palette_and_text() {
        let a = StyleKind::Advanced.spec();
        let c = StyleKind::Carmine.spec();
        assert_ne!(a.primary, c.primary);
        assert_ne!(a.captions.skills, c.captions.skills);
        // Same render order: same caption set, structure is shared code.
        assert_eq!(a.captions.languages, c.captions.languages);
    }
}
