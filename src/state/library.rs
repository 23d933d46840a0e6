use log::{info, warn};
use std::path::{Path, PathBuf};
use tokio::task;
use walkdir::WalkDir;

use super::data::{Library, LoadMode, PhotoEntry, TimestampSource};
use crate::error::{Error, Result};
use crate::media::metadata::{extract_capture_date, file_modification_date};

/// Supported image file extensions (compared case-insensitively)
pub const IMAGE_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "bmp", "gif", "tiff", "webp"];

/// Check if a path has a recognized image extension
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// Build a library from a directory in the background.
///
/// Enumeration and EXIF reads are blocking I/O, so the work is moved onto
/// tokio's blocking pool and the UI thread only receives the finished result.
pub async fn load_library(folder_path: PathBuf, mode: LoadMode) -> Result<Library> {
    task::spawn_blocking(move || load_library_blocking(&folder_path, mode))
        .await
        .map_err(|e| Error::Task(e.to_string()))?
}

/// Blocking implementation of library loading
pub fn load_library_blocking(folder_path: &Path, mode: LoadMode) -> Result<Library> {
    info!("🔍 Scanning folder: {} ({:?} mode)", folder_path.display(), mode);

    if !folder_path.is_dir() {
        return Err(Error::read_dir(folder_path, "not a directory"));
    }

    let mut entries = Vec::new();
    let mut skipped = 0;

    // Single level only; walkdir yields entries in the order the OS returns them
    for entry in WalkDir::new(folder_path)
        .follow_links(true)
        .min_depth(1)
        .max_depth(1)
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("⚠️  Skipping unreadable entry in {}: {}", folder_path.display(), e);
                continue;
            }
        };

        let path = entry.path();
        if !entry.file_type().is_file() || !is_supported_image(path) {
            continue;
        }

        let capture_date = extract_capture_date(path);
        match (mode, capture_date) {
            (_, Some(timestamp)) => entries.push(PhotoEntry::new(
                path.to_path_buf(),
                timestamp,
                TimestampSource::CaptureDate,
            )),
            (LoadMode::Archive, None) => skipped += 1,
            (LoadMode::Folder, None) => entries.push(PhotoEntry::new(
                path.to_path_buf(),
                file_modification_date(path),
                TimestampSource::Modified,
            )),
        }
    }

    if mode == LoadMode::Archive {
        // Stable sort: equal dates keep enumeration order
        entries.sort_by_key(|entry| entry.timestamp());
    }

    info!(
        "✅ Load complete: {} photos, {} skipped without capture date",
        entries.len(),
        skipped
    );

    Ok(Library::new(entries, skipped))
}
