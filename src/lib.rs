/*!
 * # bararan - Armenian vocabulary builder
 *
 * Builds a leveled Armenian vocabulary for a flashcard trainer by merging two
 * dictionaries that share nothing but their headwords.
 *
 * ## Features
 *
 * - Read a StarDict Armenian-Russian archive (metadata, binary index, gzip blob)
 * - Reconstruct the rows of a scanned Armenian-English dictionary from
 *   positioned OCR text blocks
 * - Cache each source's entries as CSV for fast re-runs
 * - Keep only headwords present in both sources, with up to five translations each
 * - Assign CEFR levels under per-level caps and a global word budget
 * - Write `vocabulary.json` atomically
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `sources`: Dictionary readers behind the `EntrySource` trait:
 *   - `sources::archive`: StarDict archive reader
 *   - `sources::layout`: OCR layout row reconstruction
 *   - `sources::cleaning`: Translation text normalization
 * - `vocabulary`: Stages after reading:
 *   - `vocabulary::cache`: Per-source CSV cache
 *   - `vocabulary::merge`: Case-insensitive headword join
 *   - `vocabulary::filter`: Headword and translation filter
 *   - `vocabulary::levels`: Level classification
 *   - `vocabulary::emitter`: Artifact serialization
 * - `app_controller`: Pipeline controller
 * - `file_utils`: File system operations
 * - `language_utils`: ISO language codes and scripts
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod sources;
pub mod vocabulary;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, RunSummary};
pub use errors::{PipelineError, SourceError};
pub use language_utils::{get_language_name, normalize_to_part2t, Script};
pub use sources::{EntrySource, RawEntry, SourceKind};
pub use vocabulary::{CefrLevel, MergedEntry, VocabularyArtifact};
