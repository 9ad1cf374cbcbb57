/*!
 * OCR layout reader.
 *
 * The English-Armenian dictionary is a scanned three-column table:
 * headword, pronunciation, English glosses. An external OCR pass dumps each
 * page as positioned text blocks; this module puts the table back together.
 *
 * ```text
 * blocks  ->  columns (by x)  ->  headword sub-entries (interpolated y)
 *                             ->  nearest pronunciation / gloss within tolerance
 * ```
 *
 * Row reconstruction is a pure function of a page's blocks, so it can be
 * tested with synthetic coordinates.
 */

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use super::cleaning::{clean_headword, clean_layout_translation, clean_pronunciation};
use super::{progress_bar, EntrySource, RawEntry, SourceKind};
use crate::app_config::{ColumnDetection, LayoutConfig};
use crate::errors::SourceError;
use crate::language_utils::Script;

/// Smallest horizontal gap treated as a column boundary when learning bands
const MIN_COLUMN_GAP: f64 = 20.0;

/// A positioned run of OCR text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    pub text: String,
}

impl TextBlock {
    pub fn new(x: f64, y: f64, width: f64, height: f64, text: &str) -> Self {
        Self {
            x,
            y,
            width,
            height,
            text: text.to_string(),
        }
    }
}

/// One page of blocks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutPage {
    #[serde(default)]
    pub number: usize,
    #[serde(default)]
    pub blocks: Vec<TextBlock>,
}

/// The whole OCR dump
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutDocument {
    #[serde(default)]
    pub pages: Vec<LayoutPage>,
}

impl LayoutDocument {
    /// Load a JSON layout dump
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| SourceError::io(path, e))?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

/// Logical table column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Headword,
    Pronunciation,
    Translation,
}

/// Left edges of the pronunciation and translation columns
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnBands {
    pub pronunciation_x: f64,
    pub translation_x: f64,
}

impl ColumnBands {
    /// Fixed bands from configuration
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self {
            pronunciation_x: config.pronunciation_column_x,
            translation_x: config.translation_column_x,
        }
    }

    /// Column a block starting at `x` belongs to
    pub fn column_of(&self, x: f64) -> Column {
        if x < self.pronunciation_x {
            Column::Headword
        } else if x < self.translation_x {
            Column::Pronunciation
        } else {
            Column::Translation
        }
    }

    /// Learn bands from a page by splitting block x-origins at the two widest gaps.
    ///
    /// Returns `None` when the page does not show three separated clusters.
    pub fn learn(blocks: &[TextBlock]) -> Option<Self> {
        let mut xs: Vec<f64> = blocks
            .iter()
            .filter(|block| !block.text.trim().is_empty())
            .map(|block| block.x)
            .collect();
        xs.sort_by(f64::total_cmp);
        xs.dedup();

        let mut gaps: Vec<(f64, f64)> = xs
            .windows(2)
            .map(|pair| (pair[1] - pair[0], (pair[0] + pair[1]) / 2.0))
            .filter(|(gap, _)| *gap >= MIN_COLUMN_GAP)
            .collect();
        if gaps.len() < 2 {
            return None;
        }

        // Widest first; equal widths keep the leftmost
        gaps.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.total_cmp(&b.1)));
        let mut boundaries = [gaps[0].1, gaps[1].1];
        boundaries.sort_by(f64::total_cmp);

        Some(Self {
            pronunciation_x: boundaries[0],
            translation_x: boundaries[1],
        })
    }
}

/// A reassembled table row
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutRow {
    pub headword: String,
    pub pronunciation: Option<String>,
    pub translation: String,
    /// Interpolated vertical position of the headword
    pub y: f64,
}

/// Rows recovered from one page
#[derive(Debug, Clone, Default)]
pub struct PageRows {
    pub rows: Vec<LayoutRow>,
    /// Headword sub-entries with no gloss within tolerance
    pub unmatched: usize,
}

#[derive(Debug, Clone)]
struct Anchor {
    y: f64,
    text: String,
}

/// Headword lines of a block with the y each one is matched at
pub fn headword_sub_entries(block: &TextBlock, script: Script) -> Vec<(String, f64)> {
    let lines: Vec<&str> = block
        .text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && script.appears_in(line))
        .collect();

    let count = lines.len();
    if count == 1 {
        return vec![(lines[0].to_string(), block.y + block.height / 2.0)];
    }

    let line_height = block.height / count as f64;
    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| (line.to_string(), block.y + (i as f64 + 0.5) * line_height))
        .collect()
}

/// Reassemble the rows of one page.
///
/// Each headword sub-entry takes the nearest pronunciation and gloss blocks
/// whose top edge lies within `tolerance` of its y; ties go to the block read
/// first. Sub-entries with no gloss are dropped.
pub fn reconstruct_rows(blocks: &[TextBlock], bands: &ColumnBands, tolerance: f64, script: Script) -> PageRows {
    let mut ordered: Vec<&TextBlock> = blocks.iter().filter(|block| !block.text.trim().is_empty()).collect();
    ordered.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));

    let mut headwords = Vec::new();
    let mut pronunciations = Vec::new();
    let mut glosses: Vec<Anchor> = Vec::new();

    for block in ordered {
        let text = block.text.trim();
        match bands.column_of(block.x) {
            Column::Headword => {
                if script.appears_in(text) {
                    headwords.extend(headword_sub_entries(block, script));
                }
            }
            Column::Pronunciation => pronunciations.push(Anchor {
                y: block.y,
                text: text.to_string(),
            }),
            Column::Translation => {
                // Page numbers and stray headword fragments are not glosses
                if !text.chars().any(|c| c.is_alphabetic() && !script.contains_char(c)) {
                    continue;
                }
                // Glosses split across blocks on the same baseline belong together
                match glosses.last_mut() {
                    Some(last) if same_baseline(last.y, block.y) => {
                        last.text.push_str(", ");
                        last.text.push_str(text);
                    }
                    _ => glosses.push(Anchor {
                        y: block.y,
                        text: text.to_string(),
                    }),
                }
            }
        }
    }

    let mut page = PageRows::default();
    for (headword, y) in headwords {
        let Some(gloss) = nearest(&glosses, y, tolerance) else {
            debug!("No gloss within {} of '{}' at y={:.1}", tolerance, headword, y);
            page.unmatched += 1;
            continue;
        };

        page.rows.push(LayoutRow {
            headword,
            pronunciation: nearest(&pronunciations, y, tolerance).map(|anchor| anchor.text.clone()),
            translation: gloss.text.clone(),
            y,
        });
    }

    page
}

fn same_baseline(a: f64, b: f64) -> bool {
    (a * 10.0).round() == (b * 10.0).round()
}

fn nearest(anchors: &[Anchor], y: f64, tolerance: f64) -> Option<&Anchor> {
    let mut best: Option<(&Anchor, f64)> = None;
    for anchor in anchors {
        let distance = (anchor.y - y).abs();
        if distance <= tolerance && best.is_none_or(|(_, best_distance)| distance < best_distance) {
            best = Some((anchor, distance));
        }
    }
    best.map(|(anchor, _)| anchor)
}

/// Turn a reassembled row into an entry, if anything usable survives cleaning
pub fn row_to_entry(row: &LayoutRow, headword_script: Script, translation_script: Script) -> Option<RawEntry> {
    let headword = clean_headword(&row.headword);
    if !headword_script.appears_in(&headword) {
        return None;
    }

    let translations = clean_layout_translation(&row.translation, translation_script);
    if translations.is_empty() {
        return None;
    }

    let pronunciation = row.pronunciation.as_deref().and_then(clean_pronunciation);
    Some(RawEntry::new(headword, translations, SourceKind::Layout).with_pronunciation(pronunciation))
}

/// Reads an OCR layout dump
pub struct LayoutReader {
    path: PathBuf,
    config: LayoutConfig,
    headword_script: Script,
    translation_script: Script,
    show_progress: bool,
}

impl LayoutReader {
    /// Create a reader for the dump at `path`
    pub fn new<P: AsRef<Path>>(
        path: P,
        config: &LayoutConfig,
        headword_script: Script,
        translation_script: Script,
    ) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            config: config.clone(),
            headword_script,
            translation_script,
            show_progress: false,
        }
    }

    /// Enable or disable progress bars
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Column bands for one page under the configured strategy
    fn bands_for(&self, page: &LayoutPage) -> ColumnBands {
        let fixed = ColumnBands::from_config(&self.config);
        match self.config.column_detection {
            ColumnDetection::Fixed => fixed,
            ColumnDetection::Learned => ColumnBands::learn(&page.blocks).unwrap_or_else(|| {
                debug!("Page {}: no clear column gaps, using fixed bands", page.number);
                fixed
            }),
        }
    }

    /// Extract entries from an already loaded document
    pub fn extract(&self, document: &LayoutDocument) -> Vec<RawEntry> {
        let progress = progress_bar(document.pages.len() as u64, "pages", self.show_progress);
        progress.set_message("Reconstructing dictionary rows");

        let mut entries = Vec::new();
        let mut unmatched = 0;
        let mut discarded = 0;

        for page in &document.pages {
            let bands = self.bands_for(page);
            let page_rows = reconstruct_rows(&page.blocks, &bands, self.config.row_tolerance, self.headword_script);
            unmatched += page_rows.unmatched;

            for row in &page_rows.rows {
                match row_to_entry(row, self.headword_script, self.translation_script) {
                    Some(entry) => entries.push(entry),
                    None => discarded += 1,
                }
            }
            progress.inc(1);
        }
        progress.finish_and_clear();

        info!(
            "Layout yielded {} entries from {} pages ({} headwords without a gloss, {} rows unusable after cleaning)",
            entries.len(),
            document.pages.len(),
            unmatched,
            discarded
        );

        entries
    }
}

impl EntrySource for LayoutReader {
    fn kind(&self) -> SourceKind {
        SourceKind::Layout
    }

    fn read_entries(&self) -> Result<Vec<RawEntry>, SourceError> {
        let document = LayoutDocument::from_path(&self.path)?;
        Ok(self.extract(&document))
    }
}
