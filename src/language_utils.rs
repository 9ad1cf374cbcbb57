use anyhow::{Result, anyhow};
use isolang::Language;
use serde::{Deserialize, Serialize};

/// Language and script utilities
///
/// This module validates ISO 639 language codes from the configuration and
/// classifies characters by writing system, which is how headwords and
/// translations are told apart across the two dictionary sources.
/// Writing system of a language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Script {
    Armenian,
    Cyrillic,
    Georgian,
    Latin,
}

impl Script {
    /// Whether a character falls in this script's Unicode block, letter or mark
    pub fn in_block(&self, c: char) -> bool {
        match self {
            // Armenian block plus the U+FB13..U+FB17 ligatures
            Self::Armenian => matches!(c, '\u{0530}'..='\u{058F}' | '\u{FB13}'..='\u{FB17}'),
            Self::Cyrillic => matches!(c, '\u{0400}'..='\u{04FF}'),
            Self::Georgian => matches!(c, '\u{10A0}'..='\u{10FF}' | '\u{1C90}'..='\u{1CBF}'),
            Self::Latin => c.is_ascii_alphabetic() || matches!(c, '\u{00C0}'..='\u{024F}'),
        }
    }

    /// Whether a character is a letter of this script
    pub fn contains_char(&self, c: char) -> bool {
        c.is_alphabetic() && self.in_block(c)
    }

    /// Whether any character of the text is a letter of this script
    pub fn appears_in(&self, text: &str) -> bool {
        text.chars().any(|c| self.contains_char(c))
    }

    /// Whether the word has a letter of this script and nothing outside its
    /// block except inner hyphens.
    ///
    /// In-block marks such as the Armenian question mark (ո՞վ) are accepted.
    pub fn is_written_in(&self, word: &str) -> bool {
        if word.starts_with('-') || word.ends_with('-') || !self.appears_in(word) {
            return false;
        }
        word.chars().all(|c| c == '-' || self.in_block(c))
    }
}

impl std::fmt::Display for Script {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Armenian => "Armenian",
            Self::Cyrillic => "Cyrillic",
            Self::Georgian => "Georgian",
            Self::Latin => "Latin",
        };
        write!(f, "{}", name)
    }
}

/// Normalize a language code to ISO 639-2/T (3-letter) format
pub fn normalize_to_part2t(code: &str) -> Result<String> {
    let normalized_code = code.trim().to_lowercase();

    if normalized_code.len() == 2 {
        if let Some(lang) = Language::from_639_1(&normalized_code) {
            return Ok(lang.to_639_3().to_string());
        }
    } else if normalized_code.len() == 3 {
        if Language::from_639_3(&normalized_code).is_some() {
            return Ok(normalized_code);
        }

        // ISO 639-2/B codes that differ from 639-2/T
        match normalized_code.as_str() {
            "arm" => return Ok("hye".to_string()),
            "geo" => return Ok("kat".to_string()),
            "fre" => return Ok("fra".to_string()),
            "ger" => return Ok("deu".to_string()),
            "gre" => return Ok("ell".to_string()),
            "mac" => return Ok("mkd".to_string()),
            "per" => return Ok("fas".to_string()),
            _ => {}
        }
    }

    Err(anyhow!("Invalid language code: {}", code))
}

/// Get the English language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = normalize_to_part2t(code)?;
    let lang = Language::from_639_3(&normalized)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", normalized))?;

    Ok(lang.to_name().to_string())
}

/// Script a language is written in
pub fn script_for_language(code: &str) -> Result<Script> {
    let script = match normalize_to_part2t(code)?.as_str() {
        "hye" => Script::Armenian,
        "rus" | "ukr" | "bel" | "bul" | "srp" | "mkd" | "kaz" => Script::Cyrillic,
        "kat" => Script::Georgian,
        _ => Script::Latin,
    };
    Ok(script)
}

/// Case-folded form used to match headwords across sources
pub fn normalize_headword(word: &str) -> String {
    word.trim().to_lowercase()
}
