/*!
 * StarDict-style archive reader.
 *
 * An archive directory holds three files sharing a stem:
 *
 * - `<stem>.ifo`: `key=value` metadata (word count, offset width, encoding)
 * - `<stem>.idx`: NUL-terminated headwords, each followed by a big-endian
 *   offset (32 or 64 bits) and a 32-bit size into the article blob
 * - `<stem>.dict.dz` (gzip) or `<stem>.dict`: the article blob
 *
 * The blob is decompressed once; articles are sliced out lazily.
 */

use byteorder::{BigEndian, ByteOrder};
use encoding_rs::{Encoding, UTF_8};
use flate2::read::GzDecoder;
use log::{debug, info, trace, warn};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::cleaning::clean_archive_translation;
use super::{progress_bar, EntrySource, RawEntry, SourceKind};
use crate::errors::SourceError;
use crate::file_utils::FileManager;
use crate::language_utils::Script;

/// Parsed `.ifo` metadata
#[derive(Debug, Clone)]
pub struct ArchiveMetadata {
    /// Dictionary title
    pub book_name: Option<String>,

    /// Declared number of index entries
    pub word_count: usize,

    /// Declared index size in bytes
    pub idx_file_size: Option<u64>,

    /// Width of index offsets, 32 or 64
    pub offset_bits: u8,

    /// Shared type sequence; when absent each article starts with a type byte
    pub same_type_sequence: Option<String>,

    /// Text encoding of headwords and articles
    pub encoding: &'static Encoding,
}

impl ArchiveMetadata {
    /// Parse the text of a `.ifo` file
    pub fn parse(text: &str) -> Result<Self, SourceError> {
        let mut book_name = None;
        let mut word_count = None;
        let mut idx_file_size = None;
        let mut offset_bits = 32;
        let mut same_type_sequence = None;
        let mut encoding = UTF_8;

        for line in text.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let (key, value) = (key.trim(), value.trim());

            match key {
                "bookname" => book_name = Some(value.to_string()),
                "wordcount" => {
                    word_count = Some(value.parse::<usize>().map_err(|_| {
                        SourceError::format(format!("wordcount is not a number: {}", value))
                    })?)
                }
                "idxfilesize" => idx_file_size = value.parse::<u64>().ok(),
                "idxoffsetbits" => {
                    offset_bits = match value {
                        "32" => 32,
                        "64" => 64,
                        _ => return Err(SourceError::format(format!("unsupported idxoffsetbits: {}", value))),
                    }
                }
                "sametypesequence" if !value.is_empty() => same_type_sequence = Some(value.to_string()),
                "encoding" => {
                    encoding = Encoding::for_label(value.as_bytes()).ok_or_else(|| {
                        SourceError::format(format!("unknown encoding label: {}", value))
                    })?
                }
                _ => {}
            }
        }

        let word_count = word_count.ok_or_else(|| SourceError::format("metadata has no wordcount"))?;

        Ok(Self {
            book_name,
            word_count,
            idx_file_size,
            offset_bits,
            same_type_sequence,
            encoding,
        })
    }

    fn offset_width(&self) -> usize {
        usize::from(self.offset_bits / 8)
    }
}

/// One headword's location in the article blob
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    pub headword: String,
    pub offset: u64,
    pub size: u32,
}

/// Parse a `.idx` file into entries.
///
/// Headwords that do not decode are skipped with a warning; a truncated
/// trailing record ends parsing. Returns the entries and the number of
/// records skipped.
pub fn parse_index(bytes: &[u8], metadata: &ArchiveMetadata) -> (Vec<IndexEntry>, usize) {
    let mut entries = Vec::with_capacity(metadata.word_count);
    let mut skipped = 0;
    let mut position = 0;
    let width = metadata.offset_width();

    while position < bytes.len() {
        let Some(nul) = bytes[position..].iter().position(|&b| b == 0) else {
            warn!("{}", SourceError::format(format!("index truncated inside a headword at byte {}", position)));
            skipped += 1;
            break;
        };

        let word_bytes = &bytes[position..position + nul];
        let fields = &bytes[position + nul + 1..];
        if fields.len() < width + 4 {
            warn!("{}", SourceError::format(format!("index truncated inside the record at byte {}", position)));
            skipped += 1;
            break;
        }

        let offset = if width == 8 {
            BigEndian::read_u64(&fields[..8])
        } else {
            u64::from(BigEndian::read_u32(&fields[..4]))
        };
        let size = BigEndian::read_u32(&fields[width..width + 4]);
        let record_start = position;
        position += nul + 1 + width + 4;

        match metadata.encoding.decode_without_bom_handling_and_without_replacement(word_bytes) {
            Some(headword) => {
                trace!("Index record '{}' at {} (+{})", headword, offset, size);
                entries.push(IndexEntry {
                    headword: headword.into_owned(),
                    offset,
                    size,
                });
            }
            None => {
                warn!("{}", SourceError::format(format!("undecodable headword at byte {}", record_start)));
                skipped += 1;
            }
        }
    }

    (entries, skipped)
}

/// Decompress an article blob, or pass it through when stored plain
pub fn decompress_blob(bytes: &[u8], compressed: bool) -> io::Result<Vec<u8>> {
    if !compressed {
        return Ok(bytes.to_vec());
    }

    let mut output = Vec::with_capacity(bytes.len() * 4);
    let mut decoder = GzDecoder::new(bytes);
    decoder.read_to_end(&mut output)?;
    Ok(output)
}

/// Paths of the three archive files
#[derive(Debug, Clone)]
pub struct ArchiveFiles {
    pub ifo: PathBuf,
    pub idx: PathBuf,
    pub dict: PathBuf,
    pub compressed: bool,
}

impl ArchiveFiles {
    /// Locate the archive files inside `dir` by the `.ifo` file's stem
    pub fn discover(dir: &Path) -> Result<Self, SourceError> {
        if !FileManager::dir_exists(dir) {
            return Err(SourceError::io(dir, io::Error::new(io::ErrorKind::NotFound, "archive directory not found")));
        }

        let ifo = WalkDir::new(dir)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.into_path())
            .find(|path| path.is_file() && path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("ifo")))
            .ok_or_else(|| SourceError::io(dir, io::Error::new(io::ErrorKind::NotFound, "no .ifo metadata file")))?;

        let idx = ifo.with_extension("idx");
        if !idx.is_file() {
            return Err(SourceError::io(&idx, io::Error::new(io::ErrorKind::NotFound, "index file missing")));
        }

        let dict_dz = ifo.with_extension("dict.dz");
        let dict_plain = ifo.with_extension("dict");
        let (dict, compressed) = if dict_dz.is_file() {
            (dict_dz, true)
        } else if dict_plain.is_file() {
            (dict_plain, false)
        } else {
            return Err(SourceError::io(&dict_dz, io::Error::new(io::ErrorKind::NotFound, "article file missing")));
        };

        Ok(Self { ifo, idx, dict, compressed })
    }
}

/// A fully loaded archive: metadata, index and decompressed blob
#[derive(Debug)]
pub struct Archive {
    pub metadata: ArchiveMetadata,
    pub index: Vec<IndexEntry>,
    blob: Vec<u8>,
    /// Index records already rejected while parsing
    pub skipped_records: usize,
}

impl Archive {
    /// Assemble an archive from parts already in memory
    pub fn from_parts(metadata: ArchiveMetadata, index_bytes: &[u8], blob: Vec<u8>) -> Self {
        let (index, skipped_records) = parse_index(index_bytes, &metadata);

        if index.len() != metadata.word_count {
            warn!(
                "{}",
                SourceError::format(format!(
                    "metadata declares {} words but the index holds {}",
                    metadata.word_count,
                    index.len()
                ))
            );
        }

        Self {
            metadata,
            index,
            blob,
            skipped_records,
        }
    }

    /// Decoded article text for one index entry
    pub fn article(&self, entry: &IndexEntry) -> Result<String, SourceError> {
        let start = usize::try_from(entry.offset).ok();
        let end = start.and_then(|start| start.checked_add(entry.size as usize));
        let bytes = match (start, end) {
            (Some(start), Some(end)) if end <= self.blob.len() => &self.blob[start..end],
            _ => {
                return Err(SourceError::format(format!(
                    "record '{}' at {}+{} exceeds the {}-byte article blob",
                    entry.headword,
                    entry.offset,
                    entry.size,
                    self.blob.len()
                )))
            }
        };

        let fields: Vec<&[u8]> = match self.metadata.same_type_sequence {
            Some(_) => bytes.split(|&b| b == 0).collect(),
            None => typed_text_fields(bytes),
        };

        let mut lines = Vec::with_capacity(fields.len());
        for field in fields.into_iter().filter(|field| !field.is_empty()) {
            let (text, had_errors) = self.metadata.encoding.decode_without_bom_handling(field);
            if had_errors {
                debug!("Replaced undecodable bytes in the article for '{}'", entry.headword);
            }
            lines.push(text.into_owned());
        }

        Ok(lines.join("\n"))
    }

    /// Lazily decode entries in index order
    pub fn entries(&self, translation_script: Script) -> ArchiveEntries<'_> {
        ArchiveEntries {
            archive: self,
            translation_script,
            position: 0,
        }
    }
}

/// Text fields of an article stored without `sametypesequence`.
///
/// Each field starts with its type byte. Lowercase types are NUL-terminated
/// text; uppercase types carry a 32-bit big-endian size and binary data,
/// which is skipped.
fn typed_text_fields(bytes: &[u8]) -> Vec<&[u8]> {
    let mut fields = Vec::new();
    let mut rest = bytes;

    while let Some((&type_marker, tail)) = rest.split_first() {
        if type_marker.is_ascii_uppercase() {
            let Some(size) = tail.get(..4).map(|size| BigEndian::read_u32(size) as usize) else {
                break;
            };
            rest = 4usize
                .checked_add(size)
                .and_then(|end| tail.get(end..))
                .unwrap_or_default();
            continue;
        }

        let end = tail.iter().position(|&b| b == 0).unwrap_or(tail.len());
        fields.push(&tail[..end]);
        rest = tail.get(end + 1..).unwrap_or_default();
    }

    fields
}

/// Iterator over an archive's usable entries.
///
/// Yields `Err` for records whose location is invalid; records whose article
/// has no usable translation are passed over.
pub struct ArchiveEntries<'a> {
    archive: &'a Archive,
    translation_script: Script,
    position: usize,
}

impl ArchiveEntries<'_> {
    /// Number of index records consumed so far
    pub fn consumed(&self) -> usize {
        self.position
    }
}

impl Iterator for ArchiveEntries<'_> {
    type Item = Result<RawEntry, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = self.archive.index.get(self.position)?;
            self.position += 1;

            let article = match self.archive.article(entry) {
                Ok(article) => article,
                Err(e) => return Some(Err(e)),
            };

            let headword = entry.headword.trim();
            let translations = clean_archive_translation(&article, self.translation_script);
            if headword.is_empty() || translations.is_empty() {
                continue;
            }

            return Some(Ok(RawEntry::new(headword, translations, SourceKind::Archive)));
        }
    }
}

/// Reads a StarDict-style archive directory
pub struct ArchiveReader {
    dir: PathBuf,
    translation_script: Script,
    show_progress: bool,
}

impl ArchiveReader {
    /// Create a reader for the archive in `dir` whose articles are written in
    /// `translation_script`
    pub fn new<P: AsRef<Path>>(dir: P, translation_script: Script) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            translation_script,
            show_progress: false,
        }
    }

    /// Enable or disable progress bars
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Load metadata, index and blob from disk
    pub fn open(&self) -> Result<Archive, SourceError> {
        let files = ArchiveFiles::discover(&self.dir)?;

        let ifo_text = fs::read_to_string(&files.ifo).map_err(|e| SourceError::io(&files.ifo, e))?;
        let metadata = ArchiveMetadata::parse(&ifo_text)?;
        info!(
            "Archive '{}': {} words declared",
            metadata.book_name.as_deref().unwrap_or("untitled"),
            metadata.word_count
        );

        let index_bytes = fs::read(&files.idx).map_err(|e| SourceError::io(&files.idx, e))?;
        if let Some(declared) = metadata.idx_file_size {
            if declared != index_bytes.len() as u64 {
                warn!(
                    "{}",
                    SourceError::format(format!(
                        "metadata declares a {}-byte index but {:?} has {} bytes",
                        declared,
                        files.idx,
                        index_bytes.len()
                    ))
                );
            }
        }

        let raw_blob = fs::read(&files.dict).map_err(|e| SourceError::io(&files.dict, e))?;
        let blob = decompress_blob(&raw_blob, files.compressed).map_err(|e| SourceError::io(&files.dict, e))?;
        debug!("Article blob: {} bytes ({} on disk)", blob.len(), raw_blob.len());

        Ok(Archive::from_parts(metadata, &index_bytes, blob))
    }
}

impl EntrySource for ArchiveReader {
    fn kind(&self) -> SourceKind {
        SourceKind::Archive
    }

    fn read_entries(&self) -> Result<Vec<RawEntry>, SourceError> {
        let archive = self.open()?;
        let progress = progress_bar(archive.index.len() as u64, "words", self.show_progress);
        progress.set_message("Extracting archive translations");

        let mut entries = Vec::with_capacity(archive.index.len());
        let mut skipped = archive.skipped_records;
        let mut iter = archive.entries(self.translation_script);

        while let Some(result) = iter.next() {
            match result {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    warn!("{}", e);
                    skipped += 1;
                }
            }
            progress.set_position(iter.consumed() as u64);
        }
        progress.finish_and_clear();

        info!(
            "Archive yielded {} entries from {} index records ({} skipped as malformed)",
            entries.len(),
            archive.index.len(),
            skipped
        );

        Ok(entries)
    }
}
