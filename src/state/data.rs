/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the background loader and the UI layer.
use chrono::{NaiveDate, NaiveDateTime};
use std::path::{Path, PathBuf};

/// Index of an entry inside the currently loaded [`Library`]
pub type EntryId = usize;

/// How a directory is turned into a library
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// Only files with an embedded capture date, sorted by that date
    Archive,
    /// Every recognized image, in filesystem order, with a modification-time fallback
    Folder,
}

/// Where an entry's timestamp came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampSource {
    CaptureDate,
    Modified,
}

/// Represents a single image in the library
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoEntry {
    path: PathBuf,
    timestamp: NaiveDateTime,
    source: TimestampSource,
}

impl PhotoEntry {
    pub fn new(path: PathBuf, timestamp: NaiveDateTime, source: TimestampSource) -> Self {
        Self {
            path,
            timestamp,
            source,
        }
    }

    /// Full path to the image file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Timestamp used for ordering and filtering
    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    /// Calendar date component of the timestamp
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    pub fn source(&self) -> TimestampSource {
        self.source
    }

    /// Filename only (e.g., "IMG_0001.JPG")
    pub fn filename(&self) -> String {
        self.path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }
}

/// Ordered sequence of entries produced by one load.
/// Replaced wholesale on every load; never mutated in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Library {
    entries: Vec<PhotoEntry>,
    /// Recognized files left out because they had no capture date (archive mode)
    skipped: usize,
}

impl Library {
    pub fn new(entries: Vec<PhotoEntry>, skipped: usize) -> Self {
        Self { entries, skipped }
    }

    pub fn entries(&self) -> &[PhotoEntry] {
        &self.entries
    }

    pub fn get(&self, id: EntryId) -> Option<&PhotoEntry> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }
}
