/*!
 * Record types that flow between the merge, filter, level and emit stages.
 */

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// CEFR proficiency band, easiest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CefrLevel {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl CefrLevel {
    /// Tag used as the artifact key
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A1 => "A1",
            Self::A2 => "A2",
            Self::B1 => "B1",
            Self::B2 => "B2",
            Self::C1 => "C1",
            Self::C2 => "C2",
        }
    }
}

impl fmt::Display for CefrLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A headword found in both sources, with translations from each
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedEntry {
    /// Headword in its stored casing
    #[serde(rename = "am")]
    pub headword: String,

    /// English translations (layout source)
    #[serde(rename = "en")]
    pub english: Vec<String>,

    /// Russian translations (archive source)
    #[serde(rename = "ru")]
    pub russian: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<String>,
}

/// A merged entry placed in a level
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeveledEntry {
    #[serde(skip)]
    pub level: CefrLevel,

    #[serde(flatten)]
    pub entry: MergedEntry,
}

/// Level tag to entries, in configured level order.
///
/// Serializes as a JSON object keyed by level tag; every configured level is
/// present even when empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VocabularyArtifact {
    levels: Vec<(CefrLevel, Vec<LeveledEntry>)>,
}

impl VocabularyArtifact {
    /// Empty artifact with the given levels in order
    pub fn with_levels<I: IntoIterator<Item = CefrLevel>>(levels: I) -> Self {
        Self {
            levels: levels.into_iter().map(|level| (level, Vec::new())).collect(),
        }
    }

    /// Append an entry to its level, adding the level if it is new
    pub fn push(&mut self, entry: LeveledEntry) {
        match self.levels.iter_mut().find(|(level, _)| *level == entry.level) {
            Some((_, entries)) => entries.push(entry),
            None => self.levels.push((entry.level, vec![entry])),
        }
    }

    /// Entries of one level
    pub fn get(&self, level: CefrLevel) -> &[LeveledEntry] {
        self.levels
            .iter()
            .find(|(l, _)| *l == level)
            .map(|(_, entries)| entries.as_slice())
            .unwrap_or(&[])
    }

    /// Levels with their entries, in order
    pub fn levels(&self) -> impl Iterator<Item = (CefrLevel, &[LeveledEntry])> {
        self.levels.iter().map(|(level, entries)| (*level, entries.as_slice()))
    }

    /// Entry count per level
    pub fn counts(&self) -> Vec<(CefrLevel, usize)> {
        self.levels.iter().map(|(level, entries)| (*level, entries.len())).collect()
    }

    /// Entries across all levels
    pub fn total_words(&self) -> usize {
        self.levels.iter().map(|(_, entries)| entries.len()).sum()
    }
}

impl Serialize for VocabularyArtifact {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.levels.len()))?;
        for (level, entries) in &self.levels {
            map.serialize_entry(level.as_str(), entries)?;
        }
        map.end()
    }
}
