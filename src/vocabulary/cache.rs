/*!
 * Per-source CSV cache.
 *
 * Each reader's output is stored as one flat CSV file so later runs can skip
 * re-parsing. Reuse is all-or-nothing per source: a cache file is either
 * loaded whole or ignored.
 */

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::app_config::CacheConfig;
use crate::errors::SourceError;
use crate::file_utils::FileManager;
use crate::sources::{RawEntry, SourceKind};

/// Separator between translations inside the `translations` column
const TRANSLATION_SEPARATOR: char = ';';

/// One CSV row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord {
    pub headword: String,
    pub translations: String,
    pub source: SourceKind,
    #[serde(default)]
    pub pronunciation: String,
}

impl From<&RawEntry> for CacheRecord {
    fn from(entry: &RawEntry) -> Self {
        Self {
            headword: entry.headword.clone(),
            translations: entry.translations.join(&TRANSLATION_SEPARATOR.to_string()),
            source: entry.source,
            pronunciation: entry.pronunciation.clone().unwrap_or_default(),
        }
    }
}

impl CacheRecord {
    /// Rebuild the entry, dropping rows with no translations
    pub fn into_entry(self) -> Option<RawEntry> {
        let translations: Vec<String> = self
            .translations
            .split(TRANSLATION_SEPARATOR)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        if self.headword.trim().is_empty() || translations.is_empty() {
            return None;
        }

        let pronunciation = Some(self.pronunciation).filter(|p| !p.trim().is_empty());
        Some(RawEntry::new(self.headword, translations, self.source).with_pronunciation(pronunciation))
    }
}

/// Cache directory plus per-source reuse flags
#[derive(Debug, Clone)]
pub struct SourceCache {
    config: CacheConfig,
}

impl SourceCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self { config: config.clone() }
    }

    /// Cache file for a source
    pub fn path(&self, source: SourceKind) -> PathBuf {
        self.config.dir.join(source.cache_file_name())
    }

    /// Cached entries for `source`, or `None` when reuse is off or nothing is cached
    pub fn load(&self, source: SourceKind) -> Result<Option<Vec<RawEntry>>, SourceError> {
        if !self.config.reuse_enabled(source) {
            debug!("Cache reuse disabled for {}", source);
            return Ok(None);
        }

        let path = self.path(source);
        if !FileManager::file_exists(&path) {
            debug!("No {} cache at {:?}", source, path);
            return Ok(None);
        }

        let entries = read_records(&path, source)?;
        info!("Loaded {} {} entries from cache {:?}", entries.len(), source, path);
        Ok(Some(entries))
    }

    /// Overwrite the cache file for `source`
    pub fn store(&self, source: SourceKind, entries: &[RawEntry]) -> Result<PathBuf, SourceError> {
        let path = self.path(source);

        let mut writer = csv::Writer::from_writer(Vec::new());
        for entry in entries {
            writer.serialize(CacheRecord::from(entry))?;
        }
        let bytes = writer.into_inner().map_err(|e| SourceError::io(&path, e.into_error()))?;

        FileManager::write_atomic(&path, &bytes).map_err(|e| SourceError::io(&path, e))?;
        info!("Cached {} {} entries to {:?}", entries.len(), source, path);
        Ok(path)
    }
}

fn read_records(path: &Path, source: SourceKind) -> Result<Vec<RawEntry>, SourceError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut entries = Vec::new();

    for record in reader.deserialize::<CacheRecord>() {
        let record = record?;
        if record.source != source {
            return Err(SourceError::format(format!(
                "cache {:?} holds a {} record for '{}'",
                path, record.source, record.headword
            )));
        }
        if let Some(entry) = record.into_entry() {
            entries.push(entry);
        }
    }

    Ok(entries)
}
