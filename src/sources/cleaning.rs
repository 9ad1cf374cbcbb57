/*!
 * Translation text normalization.
 *
 * Archive records carry free-form dictionary articles; layout rows carry
 * comma-separated glosses. Both are reduced to short, deduplicated
 * translation lists here.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::language_utils::Script;

// @const: Markup tags inside archive articles
static TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

// @const: Bullet symbols used as list markers
static SYMBOL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[◊•▪▫]").unwrap());

// @const: Leading enumeration such as "1. " or "2 "
static ENUMERATION_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.?\s*").unwrap());

// @const: Field separators inside an article
static SEPARATOR_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[;,\n]").unwrap());

// @const: Sentence break candidates, kept only before an uppercase letter
static SENTENCE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.\s+").unwrap());

// @const: Parenthesised, bracketed and braced asides
static ASIDE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\([^)]*\)|\[[^\]]*\]|\{[^}]*\}").unwrap()
});

// @const: Word of letters in any script, optionally hyphen-joined
static WORD_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{L}+(?:-\p{L}+)*").unwrap());

// @const: Leading infinitive marker or article in English glosses
static ARTICLE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:to|a|an|the)\s+").unwrap());

// @const: Whitespace runs
static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Number of comma-separated gloss groups taken from a layout row
pub const MAX_GLOSS_GROUPS: usize = 3;

/// Punctuation trimmed from headwords
const HEADWORD_TRIM: &[char] = &['.', ',', ';', ':', '(', ')', '[', ']', '{', '}'];

/// Punctuation trimmed from single translations
const WORD_TRIM: &[char] = &['.', ',', ';', ':', '!', '?'];

/// Reduce an archive article to its individual translation words.
///
/// Only words written in `translation_script` are kept.
pub fn clean_archive_translation(article: &str, translation_script: Script) -> Vec<String> {
    let text = TAG_REGEX.replace_all(article, "");
    let text = SYMBOL_REGEX.replace_all(&text, "");
    let text = ENUMERATION_REGEX.replace(text.trim(), "");

    let mut words = Vec::new();
    for field in SEPARATOR_REGEX.split(&text) {
        for part in split_sentences(field) {
            let part = ASIDE_REGEX.replace_all(part.trim(), "");
            for word in WORD_REGEX.find_iter(part.trim()) {
                let word = word.as_str().trim_end_matches(WORD_TRIM);
                if word.chars().count() >= 2 && translation_script.is_written_in(word) {
                    push_unique(&mut words, word);
                }
            }
        }
    }

    words
}

/// Reduce a layout gloss cell to its translations, keeping glosses that
/// contain a letter of `translation_script`
pub fn clean_layout_translation(text: &str, translation_script: Script) -> Vec<String> {
    let mut glosses = Vec::new();

    let groups = text
        .split([',', ';'])
        .map(str::trim)
        .filter(|group| !group.is_empty())
        .take(MAX_GLOSS_GROUPS);

    for group in groups {
        let lowered = group.to_lowercase();
        let without_asides = ASIDE_REGEX.replace_all(&lowered, "");
        let collapsed = WHITESPACE_REGEX.replace_all(without_asides.trim(), " ");
        let gloss = ARTICLE_REGEX.replace(&collapsed, "");
        let gloss = gloss.trim().trim_matches(WORD_TRIM).trim();
        if gloss.chars().count() >= 2 && translation_script.appears_in(gloss) {
            push_unique(&mut glosses, gloss);
        }
    }

    glosses
}

/// Strip list punctuation from a headword
pub fn clean_headword(word: &str) -> String {
    word.trim().trim_matches(HEADWORD_TRIM).trim().to_string()
}

/// Strip brackets from a transcription, rejecting implausible lengths
pub fn clean_pronunciation(text: &str) -> Option<String> {
    let cleaned = text.trim().trim_matches(&['[', ']', '(', ')'][..]).trim();
    let length = cleaned.chars().count();
    if (2..=50).contains(&length) {
        Some(cleaned.to_string())
    } else {
        None
    }
}

/// Append `item` unless an equal item (ignoring case) is already present
pub fn push_unique(items: &mut Vec<String>, item: &str) -> bool {
    let key = item.to_lowercase();
    if items.iter().any(|existing| existing.to_lowercase() == key) {
        return false;
    }
    items.push(item.to_string());
    true
}

/// Split on ". " only where the next sentence starts with an uppercase letter
fn split_sentences(field: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;

    for found in SENTENCE_REGEX.find_iter(field) {
        let next_is_upper = field[found.end()..]
            .chars()
            .next()
            .is_some_and(|c| c.is_uppercase());
        if next_is_upper {
            parts.push(&field[start..found.start()]);
            start = found.end();
        }
    }
    parts.push(&field[start..]);

    parts
}
