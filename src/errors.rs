/*!
 * Error types for the bararan vocabulary builder.
 *
 * Per-record problems (`SourceError::Format`) are recovered where they occur:
 * the record is skipped and a warning is logged. Whole-source and whole-run
 * problems are `PipelineError`s and abort the run before anything is emitted.
 */

use std::path::PathBuf;
use thiserror::Error;

use crate::sources::SourceKind;

/// Errors raised while reading a single dictionary source
#[derive(Error, Debug)]
pub enum SourceError {
    /// Malformed or inconsistent input structure
    #[error("Source format error: {0}")]
    Format(String),

    /// Error reading an input or cache file
    #[error("I/O error on {path:?}: {source}")]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Error reading or writing a tabular cache file
    #[error("Cache file error: {0}")]
    Csv(#[from] csv::Error),

    /// Error decoding a layout document
    #[error("Layout document error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SourceError {
    /// Shorthand for a format error
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format(message.into())
    }

    /// Attach a path to an I/O error
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

/// Errors that abort a pipeline run
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Malformed input that could not be recovered from
    #[error("Source format error in {source_kind}: {message}")]
    SourceFormat {
        /// Source that produced the error
        source_kind: SourceKind,
        /// Description of the problem
        message: String,
    },

    /// A source yielded fewer records than the configured floor
    #[error("Insufficient data from {source_kind}: found {found} entries, expected at least {required}")]
    InsufficientData {
        /// Source that fell short
        source_kind: SourceKind,
        /// Number of entries actually produced
        found: usize,
        /// Configured minimum
        required: usize,
    },

    /// The final vocabulary is below the sanity floor
    #[error("Vocabulary too small: {found} words across all levels, expected at least {required}")]
    EmptyLevel {
        /// Total words that would have been written
        found: usize,
        /// Configured minimum
        required: usize,
    },

    /// Error from a source reader or the cache
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Error writing the output artifact
    #[error("Output error: {0}")]
    Output(String),
}
