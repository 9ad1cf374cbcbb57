/*!
 * Dictionary sources.
 *
 * Both inputs are read through the [`EntrySource`] trait and produce
 * [`RawEntry`] records:
 *
 * - `archive`: StarDict-style archive (metadata, binary index, gzip blob)
 * - `layout`: positioned OCR text blocks, reassembled into table rows
 * - `cleaning`: translation text normalization shared by both readers
 */

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::SourceError;

pub mod archive;
pub mod cleaning;
pub mod layout;

pub use self::archive::ArchiveReader;
pub use self::layout::{LayoutDocument, LayoutReader, TextBlock};

/// Which dictionary a record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Structured archive (Russian translations)
    Archive,
    /// OCR layout extraction (English translations, pronunciation)
    Layout,
}

impl SourceKind {
    /// File name of this source's cache inside the cache directory
    pub fn cache_file_name(&self) -> &'static str {
        match self {
            Self::Archive => "armenian_russian.csv",
            Self::Layout => "armenian_english.csv",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Archive => write!(f, "archive"),
            Self::Layout => write!(f, "layout"),
        }
    }
}

/// One headword with its translations, as produced by a reader
#[derive(Debug, Clone, PartialEq)]
pub struct RawEntry {
    /// Dictionary headword as it appears in the source
    pub headword: String,

    /// Translations in source order
    pub translations: Vec<String>,

    /// Producing source
    pub source: SourceKind,

    /// Transcription, when the source has one
    pub pronunciation: Option<String>,
}

impl RawEntry {
    /// Create an entry without pronunciation
    pub fn new(headword: impl Into<String>, translations: Vec<String>, source: SourceKind) -> Self {
        Self {
            headword: headword.into(),
            translations,
            source,
            pronunciation: None,
        }
    }

    /// Attach a pronunciation
    pub fn with_pronunciation(mut self, pronunciation: Option<String>) -> Self {
        self.pronunciation = pronunciation;
        self
    }
}

/// Anything that can emit the entries of one dictionary source
pub trait EntrySource {
    /// Source tag carried by every emitted entry
    fn kind(&self) -> SourceKind;

    /// Parse the underlying input into entries
    fn read_entries(&self) -> Result<Vec<RawEntry>, SourceError>;
}

/// Progress bar in the application's style, or a hidden one
pub(crate) fn progress_bar(len: u64, unit: &str, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let progress_bar = ProgressBar::new(len);
    let template = format!(
        "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {} ({{percent}}%) {{msg}}",
        unit
    );
    let style = ProgressStyle::default_bar()
        .template(&template)
        .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress_bar.set_style(style.progress_chars("█▓▒░"));
    progress_bar
}
