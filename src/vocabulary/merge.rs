/*!
 * Joins the two sources by headword.
 *
 * Only headwords found in both sources survive. Matching is case-insensitive;
 * translations from repeated entries of the same source are unioned in
 * encounter order and capped.
 */

use log::{debug, info};
use std::collections::HashMap;

use crate::app_config::MergeConfig;
use crate::language_utils::normalize_headword;
use crate::sources::cleaning::push_unique;
use crate::sources::{RawEntry, SourceKind};
use crate::vocabulary::model::MergedEntry;

/// Everything one source says about a headword
#[derive(Debug, Default)]
struct SourceSide {
    /// Spellings in encounter order
    spellings: Vec<String>,
    translations: Vec<String>,
    pronunciation: Option<String>,
}

impl SourceSide {
    fn absorb(&mut self, entry: RawEntry, cap: usize) {
        if !self.spellings.contains(&entry.headword) {
            self.spellings.push(entry.headword);
        }
        for translation in &entry.translations {
            if self.translations.len() >= cap {
                break;
            }
            push_unique(&mut self.translations, translation);
        }
        if self.pronunciation.is_none() {
            self.pronunciation = entry.pronunciation;
        }
    }

    fn first_spelling(&self) -> Option<&str> {
        self.spellings.first().map(String::as_str)
    }
}

/// Headwords of one source keyed by normalized form, in first-seen order
#[derive(Debug, Default)]
struct SourceTable {
    order: Vec<String>,
    sides: HashMap<String, SourceSide>,
}

impl SourceTable {
    fn build(entries: Vec<RawEntry>, cap: usize) -> Self {
        let mut table = Self::default();
        for entry in entries {
            let key = normalize_headword(&entry.headword);
            if key.is_empty() {
                continue;
            }
            let side = table.sides.entry(key.clone()).or_insert_with(|| {
                table.order.push(key);
                SourceSide::default()
            });
            side.absorb(entry, cap);
        }
        table
    }
}

/// Headword casing to store, preferring the primary source.
///
/// An all-uppercase primary spelling loses to a secondary spelling that has
/// lowercase letters, since scanned headings are often set in capitals.
fn choose_spelling(primary: &SourceSide, secondary: &SourceSide) -> Option<String> {
    let primary_spelling = primary.first_spelling()?;
    let has_lowercase = |word: &str| word.chars().any(char::is_lowercase);

    if !has_lowercase(primary_spelling) {
        if let Some(other) = secondary.spellings.iter().find(|s| has_lowercase(s)) {
            return Some(other.clone());
        }
    }
    Some(primary_spelling.to_string())
}

/// Merge archive (Russian) and layout (English) entries.
///
/// Output order follows the primary source's first-seen headword order, so the
/// same input always merges to the same sequence.
pub fn merge_entries(archive: Vec<RawEntry>, layout: Vec<RawEntry>, config: &MergeConfig) -> Vec<MergedEntry> {
    let cap = config.max_translations;
    let archive_count = archive.len();
    let layout_count = layout.len();

    let archive_table = SourceTable::build(archive, cap);
    let layout_table = SourceTable::build(layout, cap);

    let (primary, secondary) = match config.primary_source {
        SourceKind::Layout => (&layout_table, &archive_table),
        SourceKind::Archive => (&archive_table, &layout_table),
    };

    let mut merged = Vec::new();
    for key in &primary.order {
        let (Some(primary_side), Some(secondary_side)) = (primary.sides.get(key), secondary.sides.get(key)) else {
            continue;
        };
        let Some(headword) = choose_spelling(primary_side, secondary_side) else {
            continue;
        };

        let (english, russian) = match config.primary_source {
            SourceKind::Layout => (primary_side, secondary_side),
            SourceKind::Archive => (secondary_side, primary_side),
        };
        if english.translations.is_empty() || russian.translations.is_empty() {
            debug!("Dropping '{}': one side has no translations", headword);
            continue;
        }

        merged.push(MergedEntry {
            headword,
            english: english.translations.clone(),
            russian: russian.translations.clone(),
            pronunciation: english.pronunciation.clone(),
        });
    }

    info!(
        "Merged {} headwords ({} archive entries over {} headwords, {} layout entries over {} headwords)",
        merged.len(),
        archive_count,
        archive_table.order.len(),
        layout_count,
        layout_table.order.len()
    );

    merged
}
