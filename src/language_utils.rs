use anyhow::{Result, anyhow};
use isolang::Language;

/// Language tag utilities for documentation locales
///
/// Documentation trees use IETF-style tags such as "en", "ko" or "pt-BR":
/// an ISO 639 primary subtag, optionally followed by a region subtag. This
/// module validates such tags and produces display names for them.
/// A language tag split into its validated parts
pub struct LanguageTag {
    /// ISO 639 primary subtag, lowercased
    pub primary: String,
    /// Optional region subtag, uppercased
    pub region: Option<String>,
}

impl LanguageTag {
    /// Canonical form of the tag ("pt-BR", "en")
    pub fn canonical(&self) -> String {
        match &self.region {
            Some(region) => format!("{}-{}", self.primary, region),
            None => self.primary.clone(),
        }
    }
}

/// Validate a documentation language tag ("en", "ko", "pt-BR")
pub fn validate_language_tag(tag: &str) -> Result<LanguageTag> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("Empty language tag"));
    }

    let mut parts = trimmed.split('-');
    let primary = parts.next().unwrap_or_default().to_lowercase();
    let region = parts.next().map(|r| r.to_uppercase());

    if parts.next().is_some() {
        return Err(anyhow!("Unsupported language tag with more than two subtags: {}", tag));
    }

    let valid_primary = match primary.len() {
        2 => Language::from_639_1(&primary).is_some(),
        3 => Language::from_639_3(&primary).is_some(),
        _ => false,
    };
    if !valid_primary {
        return Err(anyhow!("Invalid language tag: {}", tag));
    }

    if let Some(region) = &region {
        let valid_region = (region.len() == 2 && region.chars().all(|c| c.is_ascii_alphabetic()))
            || (region.len() == 3 && region.chars().all(|c| c.is_ascii_digit()));
        if !valid_region {
            return Err(anyhow!("Invalid region subtag in language tag: {}", tag));
        }
    }

    Ok(LanguageTag { primary, region })
}

/// Check if two language tags refer to the same locale
pub fn language_tags_match(tag1: &str, tag2: &str) -> bool {
    let normalized1 = match validate_language_tag(tag1) {
        Ok(t) => t.canonical(),
        Err(_) => return false,
    };

    let normalized2 = match validate_language_tag(tag2) {
        Ok(t) => t.canonical(),
        Err(_) => return false,
    };

    normalized1 == normalized2
}

/// Get a human-readable name for a language tag ("pt-BR" -> "Portuguese (BR)")
pub fn get_language_name(tag: &str) -> Result<String> {
    let parsed = validate_language_tag(tag)?;

    let language = match parsed.primary.len() {
        2 => Language::from_639_1(&parsed.primary),
        _ => Language::from_639_3(&parsed.primary),
    }
    .ok_or_else(|| anyhow!("Failed to get language from tag: {}", tag))?;

    Ok(match parsed.region {
        Some(region) => format!("{} ({})", language.to_name(), region),
        None => language.to_name().to_string(),
    })
}
