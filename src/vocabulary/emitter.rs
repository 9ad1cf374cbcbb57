/*!
 * Writes the leveled vocabulary artifact.
 */

use log::info;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::path::{Path, PathBuf};

use crate::app_config::OutputConfig;
use crate::errors::PipelineError;
use crate::file_utils::FileManager;
use crate::vocabulary::model::VocabularyArtifact;

/// Serializes the artifact and replaces the output file atomically
#[derive(Debug, Clone)]
pub struct Emitter {
    path: PathBuf,
    min_total_words: usize,
}

impl Emitter {
    pub fn new<P: AsRef<Path>>(path: P, min_total_words: usize) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            min_total_words,
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(&config.path, config.min_total_words)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// JSON text of the artifact, one-space indented
    pub fn render(artifact: &VocabularyArtifact) -> Result<Vec<u8>, PipelineError> {
        let mut buffer = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b" "));
        artifact
            .serialize(&mut serializer)
            .map_err(|e| PipelineError::Output(format!("Failed to serialize vocabulary: {}", e)))?;
        buffer.push(b'\n');
        Ok(buffer)
    }

    /// Check the size floor, then write.
    ///
    /// Nothing touches the output path when the floor is not met.
    pub fn emit(&self, artifact: &VocabularyArtifact) -> Result<PathBuf, PipelineError> {
        let total = artifact.total_words();
        if total < self.min_total_words {
            return Err(PipelineError::EmptyLevel {
                found: total,
                required: self.min_total_words,
            });
        }

        let bytes = Self::render(artifact)?;
        FileManager::write_atomic(&self.path, &bytes)
            .map_err(|e| PipelineError::Output(format!("Failed to write {:?}: {}", self.path, e)))?;

        info!("Wrote {} words to {:?}", total, self.path);
        Ok(self.path.clone())
    }
}
