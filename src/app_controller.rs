use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::errors::{PipelineError, SourceError};
use crate::sources::{ArchiveReader, EntrySource, LayoutReader, RawEntry, SourceKind};
use crate::vocabulary::{
    filter_entries, merge_entries, CefrLevel, Emitter, EntryFilter, LevelClassifier, SourceCache,
};

// @module: Pipeline controller for building the vocabulary

/// Entries obtained for one source
#[derive(Debug)]
pub struct SourceLoad {
    pub entries: Vec<RawEntry>,
    /// Whether the entries came from the cache rather than a fresh parse
    pub from_cache: bool,
}

/// What a successful run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub archive_entries: usize,
    pub layout_entries: usize,
    pub archive_from_cache: bool,
    pub layout_from_cache: bool,
    pub merged: usize,
    pub filtered: usize,
    pub level_counts: Vec<(CefrLevel, usize)>,
    pub output_path: PathBuf,
    pub elapsed: Duration,
}

impl RunSummary {
    /// Words written across all levels
    pub fn total_words(&self) -> usize {
        self.level_counts.iter().map(|(_, count)| count).sum()
    }
}

/// Runs the read, merge, filter, classify and emit stages
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Invalid configuration")?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build the vocabulary from the configured archive and layout inputs
    pub fn run(&self) -> Result<RunSummary> {
        let archive = ArchiveReader::new(&self.config.sources.archive_dir, self.config.archive_script()?)
            .with_progress(self.config.show_progress);
        let layout = LayoutReader::new(
            &self.config.sources.layout_file,
            &self.config.layout,
            self.config.headword_script()?,
            self.config.layout_script()?,
        )
        .with_progress(self.config.show_progress);

        self.run_with_sources(&archive, &layout)
    }

    /// Run the pipeline over explicit readers
    pub fn run_with_sources(&self, archive: &dyn EntrySource, layout: &dyn EntrySource) -> Result<RunSummary> {
        let start_time = Instant::now();
        let cache = SourceCache::new(&self.config.cache);

        let stage_start = Instant::now();
        let archive_load = self
            .load_source(&cache, archive)
            .with_context(|| format!("Failed to load {} entries from {:?}", archive.kind(), self.config.sources.archive_dir))?;
        let layout_load = self
            .load_source(&cache, layout)
            .with_context(|| format!("Failed to load {} entries from {:?}", layout.kind(), self.config.sources.layout_file))?;
        info!("Sources loaded in {}", Self::format_duration(stage_start.elapsed()));

        let archive_entries = archive_load.entries.len();
        let layout_entries = layout_load.entries.len();

        let stage_start = Instant::now();
        let merged = merge_entries(archive_load.entries, layout_load.entries, &self.config.merge);
        let merged_count = merged.len();

        let filter = EntryFilter::new(
            self.config.headword_script()?,
            self.config.layout_script()?,
            self.config.archive_script()?,
            &self.config.filter,
        );
        let filtered = filter_entries(merged, &filter);
        let filtered_count = filtered.len();

        let artifact = LevelClassifier::from_config(&self.config.levels).classify(filtered);
        debug!("Merge, filter and classification took {}", Self::format_duration(stage_start.elapsed()));

        let emitter = Emitter::from_config(&self.config.output);
        let output_path = emitter
            .emit(&artifact)
            .with_context(|| format!("Failed to emit vocabulary to {:?}", emitter.path()))?;

        let elapsed = start_time.elapsed();
        info!("Vocabulary built in {}", Self::format_duration(elapsed));

        Ok(RunSummary {
            archive_entries,
            layout_entries,
            archive_from_cache: archive_load.from_cache,
            layout_from_cache: layout_load.from_cache,
            merged: merged_count,
            filtered: filtered_count,
            level_counts: artifact.counts(),
            output_path,
            elapsed,
        })
    }

    /// Cached entries when reuse is allowed and they meet the floor, otherwise a fresh parse.
    ///
    /// A fresh parse below the floor is fatal and leaves the cache untouched.
    pub fn load_source(&self, cache: &SourceCache, source: &dyn EntrySource) -> Result<SourceLoad, PipelineError> {
        let kind = source.kind();
        let required = self.config.sources.min_entries_per_source;

        match cache.load(kind) {
            Ok(Some(entries)) if entries.len() >= required => {
                return Ok(SourceLoad {
                    entries,
                    from_cache: true,
                });
            }
            Ok(Some(entries)) => warn!(
                "Cached {} entries ({}) are below the floor of {}, parsing again",
                kind,
                entries.len(),
                required
            ),
            Ok(None) => {}
            Err(e) => warn!("Ignoring unreadable {} cache at {:?}: {}", kind, cache.path(kind), e),
        }

        info!("Parsing {} source", kind);
        let entries = source.read_entries().map_err(|e| source_failure(kind, e))?;
        if entries.len() < required {
            return Err(PipelineError::InsufficientData {
                source_kind: kind,
                found: entries.len(),
                required,
            });
        }

        if let Err(e) = cache.store(kind, &entries) {
            warn!("Could not cache {} entries: {}", kind, e);
        }

        Ok(SourceLoad {
            entries,
            from_cache: false,
        })
    }

    // Format duration in a human-readable format
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}

fn source_failure(kind: SourceKind, error: SourceError) -> PipelineError {
    match error {
        SourceError::Format(message) => PipelineError::SourceFormat {
            source_kind: kind,
            message,
        },
        other => PipelineError::Source(other),
    }
}
