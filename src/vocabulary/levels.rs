/*!
 * Proficiency level classifier.
 *
 * Each entry gets a complexity score from its headword's length and
 * morphology. Entries are placed simplest first into the band their score
 * falls in; a full band pushes the entry to the next harder band with room,
 * then to the nearest easier one. Placement stops once the global word
 * budget is spent.
 */

use log::{debug, info};
use std::cmp::Ordering;

use crate::app_config::{LevelBand, LevelsConfig};
use crate::vocabulary::model::{LeveledEntry, MergedEntry, VocabularyArtifact};

/// Score added per matching abstract suffix
const SUFFIX_WEIGHT: f64 = 2.0;

/// Score added for compounds and very long words
const COMPOUND_WEIGHT: f64 = 1.5;

/// Headwords longer than this count as compounds
const COMPOUND_LENGTH: usize = 15;

/// Score removed when a pronunciation is known
const PRONUNCIATION_BONUS: f64 = 0.5;

/// Score added per headword character
const LENGTH_WEIGHT: f64 = 0.1;

/// Deterministic level assignment under per-band caps
#[derive(Debug, Clone)]
pub struct LevelClassifier {
    bands: Vec<LevelBand>,
    max_words: usize,
    complex_suffixes: Vec<String>,
}

impl LevelClassifier {
    pub fn from_config(config: &LevelsConfig) -> Self {
        Self {
            bands: config.bands.clone(),
            max_words: config.max_words,
            complex_suffixes: config.complex_suffixes.clone(),
        }
    }

    /// Complexity score; lower is simpler
    pub fn complexity(&self, entry: &MergedEntry) -> f64 {
        let word = entry.headword.as_str();
        let length = word.chars().count();

        let mut score = length as f64 * LENGTH_WEIGHT;
        for suffix in &self.complex_suffixes {
            if word.ends_with(suffix.as_str()) {
                score += SUFFIX_WEIGHT;
            }
        }
        if word.contains('-') || length > COMPOUND_LENGTH {
            score += COMPOUND_WEIGHT;
        }
        if entry.pronunciation.is_some() {
            score -= PRONUNCIATION_BONUS;
        }

        score
    }

    /// Index of the band a score naturally falls in
    pub fn natural_band(&self, score: f64) -> usize {
        self.bands
            .iter()
            .position(|band| band.max_complexity.is_none_or(|max| score <= max))
            .unwrap_or(self.bands.len().saturating_sub(1))
    }

    /// Bands to try for an entry whose natural band is `natural`: itself,
    /// then harder bands in order, then easier bands nearest first
    fn placement_order(&self, natural: usize) -> impl Iterator<Item = usize> {
        let harder = natural..self.bands.len();
        let easier = (0..natural).rev();
        harder.chain(easier)
    }

    /// Assign levels to the whole filtered set
    pub fn classify(&self, entries: Vec<MergedEntry>) -> VocabularyArtifact {
        let mut artifact = VocabularyArtifact::with_levels(self.bands.iter().map(|band| band.level));
        let candidates = entries.len();

        let mut scored: Vec<(f64, MergedEntry)> = entries
            .into_iter()
            .map(|entry| (self.complexity(&entry), entry))
            .collect();
        scored.sort_by(|(a_score, a), (b_score, b)| compare_candidates(*a_score, a, *b_score, b));

        let mut filled = vec![0usize; self.bands.len()];
        let mut placed = 0;
        let mut overflow = 0;

        for (score, entry) in scored {
            if placed >= self.max_words {
                break;
            }

            let natural = self.natural_band(score);
            let Some(index) = self.placement_order(natural).find(|&i| filled[i] < self.bands[i].cap) else {
                overflow += 1;
                debug!("No level has room for '{}' (score {:.2})", entry.headword, score);
                continue;
            };

            if index != natural {
                debug!(
                    "'{}' moved from {} to {} (score {:.2})",
                    entry.headword, self.bands[natural].level, self.bands[index].level, score
                );
            }

            filled[index] += 1;
            placed += 1;
            artifact.push(LeveledEntry {
                level: self.bands[index].level,
                entry,
            });
        }

        info!(
            "Placed {} of {} entries in {} levels ({} dropped: all levels full, {} over the {}-word budget)",
            placed,
            candidates,
            self.bands.len(),
            overflow,
            candidates - placed - overflow,
            self.max_words
        );

        artifact
    }
}

/// Simplest first; ties broken by length then by headword
fn compare_candidates(a_score: f64, a: &MergedEntry, b_score: f64, b: &MergedEntry) -> Ordering {
    a_score
        .total_cmp(&b_score)
        .then_with(|| a.headword.chars().count().cmp(&b.headword.chars().count()))
        .then_with(|| a.headword.cmp(&b.headword))
}
