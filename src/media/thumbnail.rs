use iced::widget::image::Handle;
use image::RgbaImage;
use log::{debug, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Bounding box of generated thumbnails (aspect ratio preserved)
pub const THUMBNAIL_SIZE: u32 = 200;

/// A decoded preview ready for display
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    pub handle: Handle,
}

impl Thumbnail {
    fn from_rgba(preview: RgbaImage) -> Self {
        let (width, height) = preview.dimensions();
        Self {
            width,
            height,
            handle: Handle::from_rgba(width, height, preview.into_raw()),
        }
    }
}

/// Decode an image and scale it down to fit in [`THUMBNAIL_SIZE`]
pub fn render_thumbnail(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path).map_err(|e| Error::decode(path, e))?;

    // Never upscale small images
    if img.width() <= THUMBNAIL_SIZE && img.height() <= THUMBNAIL_SIZE {
        return Ok(img.to_rgba8());
    }
    Ok(img.thumbnail(THUMBNAIL_SIZE, THUMBNAIL_SIZE).to_rgba8())
}

/// In-memory thumbnail memo keyed by file path.
///
/// Scoped to one loaded library: the session clears it on every load.
/// Paths are trusted as stable keys; there is no staleness check and no
/// eviction besides [`ThumbnailCache::clear`].
#[derive(Debug, Default)]
pub struct ThumbnailCache {
    entries: HashMap<PathBuf, Thumbnail>,
    /// Number of decodes performed, for diagnostics
    decodes: usize,
}

impl ThumbnailCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached thumbnail for `path`, decoding it from disk on a miss
    pub fn get(&mut self, path: &Path) -> Result<Thumbnail> {
        self.get_with(path, render_thumbnail)
    }

    /// Like [`ThumbnailCache::get`] with a custom renderer for misses.
    /// Failures are not cached.
    pub fn get_with<F>(&mut self, path: &Path, render: F) -> Result<Thumbnail>
    where
        F: FnOnce(&Path) -> Result<RgbaImage>,
    {
        if let Some(thumbnail) = self.entries.get(path) {
            return Ok(thumbnail.clone());
        }

        self.decodes += 1;
        let thumbnail = match render(path) {
            Ok(preview) => Thumbnail::from_rgba(preview),
            Err(e) => {
                warn!("⚠️  Error displaying image {}: {}", path.display(), e);
                return Err(e);
            }
        };

        debug!(
            "📸 Generated thumbnail {}x{} for {}",
            thumbnail.width,
            thumbnail.height,
            path.display()
        );
        self.entries.insert(path.to_path_buf(), thumbnail.clone());
        Ok(thumbnail)
    }

    /// Drop every cached thumbnail
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[cfg(test)]
    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn decode_count(&self) -> usize {
        self.decodes
    }
}
