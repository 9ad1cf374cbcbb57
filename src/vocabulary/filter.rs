/*!
 * Headword and translation filter.
 *
 * Drops merged entries whose headword looks like noise (numbers,
 * abbreviations, stray letters, other scripts) and trims translations that
 * are too short or leaked in from the headword language.
 */

use log::{debug, info};
use std::collections::BTreeMap;
use std::fmt;

use crate::app_config::FilterConfig;
use crate::language_utils::Script;
use crate::vocabulary::model::MergedEntry;

/// Why an entry was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rejection {
    Numeric,
    Length,
    Abbreviation,
    ForeignScript,
    NoEnglish,
    NoRussian,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::Numeric => "numeric headword",
            Self::Length => "headword length out of range",
            Self::Abbreviation => "abbreviation",
            Self::ForeignScript => "headword outside the target script",
            Self::NoEnglish => "no English translation left",
            Self::NoRussian => "no Russian translation left",
        };
        write!(f, "{}", reason)
    }
}

/// Applies the filter rules for one headword script
#[derive(Debug, Clone)]
pub struct EntryFilter {
    script: Script,
    /// Script of the English list (layout source)
    english_script: Script,
    /// Script of the Russian list (archive source)
    russian_script: Script,
    config: FilterConfig,
}

impl EntryFilter {
    pub fn new(script: Script, english_script: Script, russian_script: Script, config: &FilterConfig) -> Self {
        Self {
            script,
            english_script,
            russian_script,
            config: config.clone(),
        }
    }

    /// Check a headword against the drop rules
    pub fn check_headword(&self, headword: &str) -> Result<(), Rejection> {
        let length = headword.chars().count();

        if length > 0 && headword.chars().all(|c| c.is_numeric()) {
            return Err(Rejection::Numeric);
        }
        if length < self.config.min_headword_len || length > self.config.max_headword_len {
            return Err(Rejection::Length);
        }
        if is_abbreviation(headword) {
            return Err(Rejection::Abbreviation);
        }
        if !self.script.is_written_in(headword) {
            return Err(Rejection::ForeignScript);
        }
        Ok(())
    }

    /// Whether a single translation of a list written in `list_script` is kept
    pub fn keeps_translation(&self, translation: &str, list_script: Script) -> bool {
        translation.chars().count() >= self.config.min_translation_len
            && list_script.appears_in(translation)
            && !self.script.appears_in(translation)
    }

    /// Keep, trim or drop one entry
    pub fn apply(&self, mut entry: MergedEntry) -> Result<MergedEntry, Rejection> {
        self.check_headword(&entry.headword)?;

        entry.english.retain(|t| self.keeps_translation(t, self.english_script));
        entry.russian.retain(|t| self.keeps_translation(t, self.russian_script));

        if entry.english.is_empty() {
            return Err(Rejection::NoEnglish);
        }
        if entry.russian.is_empty() {
            return Err(Rejection::NoRussian);
        }
        Ok(entry)
    }
}

/// All-caps token of at most three letters
fn is_abbreviation(word: &str) -> bool {
    word.chars().count() <= 3
        && word.chars().all(char::is_alphabetic)
        && word.chars().any(char::is_uppercase)
        && !word.chars().any(char::is_lowercase)
}

/// Filter a merged set, logging how many entries each rule removed
pub fn filter_entries(entries: Vec<MergedEntry>, filter: &EntryFilter) -> Vec<MergedEntry> {
    let total = entries.len();
    let mut rejected: BTreeMap<Rejection, usize> = BTreeMap::new();
    let mut kept = Vec::with_capacity(total);

    for entry in entries {
        let headword = entry.headword.clone();
        match filter.apply(entry) {
            Ok(entry) => kept.push(entry),
            Err(reason) => {
                debug!("Filtered '{}': {}", headword, reason);
                *rejected.entry(reason).or_default() += 1;
            }
        }
    }

    info!("Filter kept {} of {} merged entries", kept.len(), total);
    for (reason, count) in &rejected {
        info!("  {} dropped: {}", count, reason);
    }

    kept
}
