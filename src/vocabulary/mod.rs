/*!
 * Vocabulary stages downstream of the readers.
 *
 * ```text
 * cache -> merge -> filter -> levels -> emitter
 * ```
 */

pub mod cache;
pub mod emitter;
pub mod filter;
pub mod levels;
pub mod merge;
pub mod model;

pub use self::cache::SourceCache;
pub use self::emitter::Emitter;
pub use self::filter::{filter_entries, EntryFilter, Rejection};
pub use self::levels::LevelClassifier;
pub use self::merge::merge_entries;
pub use self::model::{CefrLevel, LeveledEntry, MergedEntry, VocabularyArtifact};
