use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::language_utils::{self, Script};
use crate::sources::SourceKind;
use crate::vocabulary::model::CefrLevel;

/// Application configuration module
/// This module handles loading and validating the pipeline configuration.
/// Every stage reads its settings from here; nothing is process-global.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Languages of headwords and of each source's translations
    #[serde(default)]
    pub languages: LanguageConfig,

    /// Input locations
    #[serde(default)]
    pub sources: SourcesConfig,

    /// Per-source cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// OCR layout reconstruction settings
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Merge settings
    #[serde(default)]
    pub merge: MergeConfig,

    /// Headword and translation filter settings
    #[serde(default)]
    pub filter: FilterConfig,

    /// Level classification settings
    #[serde(default)]
    pub levels: LevelsConfig,

    /// Output artifact settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Whether to draw progress bars
    #[serde(default = "default_true")]
    pub show_progress: bool,
}

/// Language codes (ISO 639-1 or 639-2)
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LanguageConfig {
    /// Language of the headwords
    #[serde(default = "default_headword_language")]
    pub headword: String,

    /// Translation language of the archive source
    #[serde(default = "default_archive_language")]
    pub archive: String,

    /// Translation language of the layout source
    #[serde(default = "default_layout_language")]
    pub layout: String,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            headword: default_headword_language(),
            archive: default_archive_language(),
            layout: default_layout_language(),
        }
    }
}

/// Input locations and yield floor
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SourcesConfig {
    /// Directory holding the .ifo/.idx/.dict.dz archive
    #[serde(default = "default_archive_dir")]
    pub archive_dir: PathBuf,

    /// JSON dump of positioned OCR text blocks
    #[serde(default = "default_layout_file")]
    pub layout_file: PathBuf,

    /// Minimum entries each source must yield
    #[serde(default = "default_min_entries_per_source")]
    pub min_entries_per_source: usize,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            archive_dir: default_archive_dir(),
            layout_file: default_layout_file(),
            min_entries_per_source: default_min_entries_per_source(),
        }
    }
}

/// Cache settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CacheConfig {
    /// Directory for the per-source CSV files
    #[serde(default = "default_cache_dir")]
    pub dir: PathBuf,

    /// Reuse the archive cache when present
    #[serde(default = "default_true")]
    pub reuse_archive: bool,

    /// Reuse the layout cache when present
    #[serde(default = "default_true")]
    pub reuse_layout: bool,
}

impl CacheConfig {
    /// Whether cached records may stand in for a fresh parse of `source`
    pub fn reuse_enabled(&self, source: SourceKind) -> bool {
        match source {
            SourceKind::Archive => self.reuse_archive,
            SourceKind::Layout => self.reuse_layout,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
            reuse_archive: true,
            reuse_layout: true,
        }
    }
}

/// How column bands are found on a page
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColumnDetection {
    /// Fixed x thresholds
    #[default]
    Fixed,
    /// Cluster x origins per page, falling back to fixed thresholds
    Learned,
}

/// OCR layout reconstruction settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LayoutConfig {
    /// Maximum vertical distance for blocks to share a row
    #[serde(default = "default_row_tolerance")]
    pub row_tolerance: f64,

    /// Column band strategy
    #[serde(default)]
    pub column_detection: ColumnDetection,

    /// Left edge of the pronunciation column
    #[serde(default = "default_pronunciation_column_x")]
    pub pronunciation_column_x: f64,

    /// Left edge of the translation column
    #[serde(default = "default_translation_column_x")]
    pub translation_column_x: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            row_tolerance: default_row_tolerance(),
            column_detection: ColumnDetection::default(),
            pronunciation_column_x: default_pronunciation_column_x(),
            translation_column_x: default_translation_column_x(),
        }
    }
}

/// Merge settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MergeConfig {
    /// Maximum translations kept per language
    #[serde(default = "default_max_translations")]
    pub max_translations: usize,

    /// Source whose headword casing is stored
    #[serde(default = "default_primary_source")]
    pub primary_source: SourceKind,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            max_translations: default_max_translations(),
            primary_source: default_primary_source(),
        }
    }
}

/// Filter settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FilterConfig {
    /// Shortest headword kept, in characters
    #[serde(default = "default_min_headword_len")]
    pub min_headword_len: usize,

    /// Longest headword kept, in characters
    #[serde(default = "default_max_headword_len")]
    pub max_headword_len: usize,

    /// Shortest translation kept, in characters
    #[serde(default = "default_min_translation_len")]
    pub min_translation_len: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_headword_len: default_min_headword_len(),
            max_headword_len: default_max_headword_len(),
            min_translation_len: default_min_translation_len(),
        }
    }
}

/// One proficiency band
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LevelBand {
    /// Level tag
    pub level: CefrLevel,

    /// Maximum entries in this band
    pub cap: usize,

    /// Highest complexity score that naturally lands here; `None` is unbounded
    #[serde(default)]
    pub max_complexity: Option<f64>,
}

/// Level classification settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LevelsConfig {
    /// Global word budget across all bands
    #[serde(default = "default_max_words")]
    pub max_words: usize,

    /// Bands from easiest to hardest
    #[serde(default = "default_bands")]
    pub bands: Vec<LevelBand>,

    /// Suffixes that mark abstract or derived words
    #[serde(default = "default_complex_suffixes")]
    pub complex_suffixes: Vec<String>,
}

impl Default for LevelsConfig {
    fn default() -> Self {
        Self {
            max_words: default_max_words(),
            bands: default_bands(),
            complex_suffixes: default_complex_suffixes(),
        }
    }
}

/// Output artifact settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OutputConfig {
    /// Path of the vocabulary JSON
    #[serde(default = "default_output_path")]
    pub path: PathBuf,

    /// Fewest total words accepted for a run to succeed
    #[serde(default = "default_min_total_words")]
    pub min_total_words: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            min_total_words: default_min_total_words(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_true() -> bool {
    true
}

fn default_headword_language() -> String {
    "hy".to_string()
}

fn default_archive_language() -> String {
    "ru".to_string()
}

fn default_layout_language() -> String {
    "en".to_string()
}

fn default_archive_dir() -> PathBuf {
    PathBuf::from("vocabulary_sources/ArmRus_1.28")
}

fn default_layout_file() -> PathBuf {
    PathBuf::from("vocabulary_sources/armenian_english_layout.json")
}

fn default_min_entries_per_source() -> usize {
    1000
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("cache")
}

fn default_row_tolerance() -> f64 {
    10.0
}

fn default_pronunciation_column_x() -> f64 {
    200.0
}

fn default_translation_column_x() -> f64 {
    350.0
}

fn default_max_translations() -> usize {
    5
}

fn default_primary_source() -> SourceKind {
    SourceKind::Layout
}

fn default_min_headword_len() -> usize {
    2
}

fn default_max_headword_len() -> usize {
    20
}

fn default_min_translation_len() -> usize {
    3
}

fn default_max_words() -> usize {
    10_000
}

fn default_bands() -> Vec<LevelBand> {
    vec![
        LevelBand { level: CefrLevel::A1, cap: 2500, max_complexity: Some(0.5) },
        LevelBand { level: CefrLevel::A2, cap: 2500, max_complexity: Some(0.8) },
        LevelBand { level: CefrLevel::B1, cap: 2500, max_complexity: Some(1.2) },
        LevelBand { level: CefrLevel::B2, cap: 2500, max_complexity: None },
    ]
}

fn default_complex_suffixes() -> Vec<String> {
    ["ություն", "ական", "ային", "ավոր", "ականություն"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_output_path() -> PathBuf {
    PathBuf::from("vocabulary.json")
}

fn default_min_total_words() -> usize {
    1000
}

impl Config {
    /// Load a configuration file, falling back to defaults when it is absent
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<(Self, bool)> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok((Self::default(), false));
        }

        let file = File::open(path)
            .map_err(|e| anyhow!("Failed to open config file {:?}: {}", path, e))?;
        let config: Config = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| anyhow!("Failed to parse config file {:?}: {}", path, e))?;
        Ok((config, true))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        for code in [&self.languages.headword, &self.languages.archive, &self.languages.layout] {
            let _name = language_utils::get_language_name(code)?;
        }
        let headword_script = self.headword_script()?;
        for (field, script) in [("archive", self.archive_script()?), ("layout", self.layout_script()?)] {
            if script == headword_script {
                return Err(anyhow!(
                    "languages.{} is written in {}, the same script as the headwords",
                    field, script
                ));
            }
        }

        if self.sources.min_entries_per_source == 0 {
            return Err(anyhow!("sources.min_entries_per_source must be at least 1"));
        }

        if !(self.layout.row_tolerance > 0.0) {
            return Err(anyhow!("layout.row_tolerance must be positive"));
        }
        if self.layout.pronunciation_column_x >= self.layout.translation_column_x {
            return Err(anyhow!(
                "layout.pronunciation_column_x ({}) must be left of layout.translation_column_x ({})",
                self.layout.pronunciation_column_x, self.layout.translation_column_x
            ));
        }

        if self.merge.max_translations == 0 {
            return Err(anyhow!("merge.max_translations must be at least 1"));
        }

        if self.filter.min_headword_len > self.filter.max_headword_len {
            return Err(anyhow!(
                "filter.min_headword_len ({}) exceeds filter.max_headword_len ({})",
                self.filter.min_headword_len, self.filter.max_headword_len
            ));
        }

        if self.levels.bands.is_empty() {
            return Err(anyhow!("levels.bands must list at least one level"));
        }
        let mut seen = HashSet::new();
        for band in &self.levels.bands {
            if !seen.insert(band.level) {
                return Err(anyhow!("Level {} is configured more than once", band.level));
            }
            if band.cap == 0 {
                return Err(anyhow!("Level {} has a cap of zero", band.level));
            }
        }
        if self.levels.bands.windows(2).any(|w| w[0].level >= w[1].level) {
            return Err(anyhow!("levels.bands must be listed from easiest to hardest"));
        }
        if self.levels.max_words == 0 {
            return Err(anyhow!("levels.max_words must be at least 1"));
        }

        Ok(())
    }

    /// Script headwords are expected to be written in
    pub fn headword_script(&self) -> Result<Script> {
        language_utils::script_for_language(&self.languages.headword)
    }

    /// Script of the archive source's translations
    pub fn archive_script(&self) -> Result<Script> {
        language_utils::script_for_language(&self.languages.archive)
    }

    /// Script of the layout source's translations
    pub fn layout_script(&self) -> Result<Script> {
        language_utils::script_for_language(&self.languages.layout)
    }

    /// Apply the command-line cache bypass flags
    pub fn apply_cache_flags(&mut self, no_cache: bool, no_cache_russian: bool, no_cache_english: bool) {
        if no_cache || no_cache_russian {
            self.cache.reuse_archive = false;
        }
        if no_cache || no_cache_english {
            self.cache.reuse_layout = false;
        }
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            languages: LanguageConfig::default(),
            sources: SourcesConfig::default(),
            cache: CacheConfig::default(),
            layout: LayoutConfig::default(),
            merge: MergeConfig::default(),
            filter: FilterConfig::default(),
            levels: LevelsConfig::default(),
            output: OutputConfig::default(),
            log_level: LogLevel::default(),
            show_progress: true,
        }
    }
}
