/// The browsing session: one explicit state object owned by the UI thread.
///
/// Holds the loaded library, the date filter, pagination, the thumbnail
/// memo and the (at most one) open viewer. Background loads hand their
/// finished library back through [`Session::finish_load`].
use log::{debug, info, warn};
use std::path::PathBuf;

use super::data::{EntryId, Library, LoadMode, PhotoEntry, TimestampSource};
use super::paginate::{effective_view, DateFilter, Pagination};
use super::settings::{Settings, GRID_COLUMNS_RANGE, PAGE_SIZE_RANGE};
use crate::error::{Error, Result};
use crate::media::thumbnail::{Thumbnail, ThumbnailCache};
use crate::media::viewport::{FrameLimits, Viewport};

/// Identifies one load request. Only the newest ticket may apply its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

/// One rendered grid cell
#[derive(Debug, Clone)]
pub struct GridCell {
    pub id: EntryId,
    pub filename: String,
    /// Date caption, marked when it comes from the file's modification time
    pub caption: String,
    pub thumbnail: Thumbnail,
}

#[derive(Debug)]
pub struct Session {
    library: Library,
    mode: Option<LoadMode>,
    directory: Option<PathBuf>,
    filter: DateFilter,
    pagination: Pagination,
    grid_columns: usize,
    thumbnails: ThumbnailCache,
    viewport: Option<Viewport>,
    frame_limits: FrameLimits,
    /// Generation of the most recently started load
    load_generation: u64,
    loading: bool,
}

impl Session {
    pub fn new(settings: &Settings) -> Self {
        Self {
            library: Library::default(),
            mode: None,
            directory: None,
            filter: DateFilter::default(),
            pagination: Pagination::new(settings.photos_per_page),
            grid_columns: settings.grid_columns,
            thumbnails: ThumbnailCache::new(),
            viewport: None,
            frame_limits: FrameLimits::from_settings(settings),
            load_generation: 0,
            loading: false,
        }
    }

    // ========== Loading ==========

    /// Register a new load request; any load still in flight becomes stale
    pub fn begin_load(&mut self, directory: PathBuf, mode: LoadMode) -> LoadTicket {
        self.load_generation += 1;
        self.loading = true;
        self.directory = Some(directory);
        self.mode = Some(mode);
        LoadTicket {
            generation: self.load_generation,
        }
    }

    /// Apply a finished load atomically.
    ///
    /// Returns false when the ticket was superseded by a newer load, in which
    /// case nothing changes.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: Result<Library>) -> Result<bool> {
        if ticket.generation != self.load_generation {
            info!(
                "Discarding stale load result (generation {}, latest {})",
                ticket.generation, self.load_generation
            );
            return Ok(false);
        }
        self.loading = false;

        let library = result?;
        self.library = library;
        self.filter = DateFilter::default();
        self.pagination.reset();
        self.thumbnails.clear();
        Ok(true)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn mode(&self) -> Option<LoadMode> {
        self.mode
    }

    pub fn directory(&self) -> Option<&PathBuf> {
        self.directory.as_ref()
    }

    // ========== Filtering & pagination ==========

    /// Parse and apply a date filter. Invalid text leaves the current filter in place.
    pub fn set_date_filter(&mut self, text: &str) -> Result<()> {
        self.filter = DateFilter::parse(text)?;
        self.pagination.reset();
        Ok(())
    }

    pub fn clear_date_filter(&mut self) {
        self.filter = DateFilter::default();
        self.pagination.reset();
    }

    pub fn filter(&self) -> &DateFilter {
        &self.filter
    }

    /// Filtered entries in library order
    pub fn effective_view(&self) -> Vec<(EntryId, &PhotoEntry)> {
        effective_view(&self.library, &self.filter)
    }

    pub fn filtered_count(&self) -> usize {
        self.effective_view().len()
    }

    /// Entries on the current page, after clamping the page into range
    pub fn current_page_entries(&self) -> Vec<(EntryId, &PhotoEntry)> {
        let view = self.effective_view();
        self.pagination.slice(&view).to_vec()
    }

    pub fn current_page(&self) -> usize {
        self.pagination
            .current_page()
            .min(self.total_pages())
    }

    pub fn total_pages(&self) -> usize {
        self.pagination.total_pages(self.filtered_count())
    }

    pub fn page_size(&self) -> usize {
        self.pagination.page_size()
    }

    pub fn grid_columns(&self) -> usize {
        self.grid_columns
    }

    pub fn next_page(&mut self) -> bool {
        let count = self.filtered_count();
        self.pagination.next_page(count)
    }

    pub fn prev_page(&mut self) -> bool {
        self.pagination.prev_page()
    }

    /// Change photos per page (clamped to the allowed range); back to page 1
    pub fn set_page_size(&mut self, page_size: usize) {
        let page_size = page_size.clamp(*PAGE_SIZE_RANGE.start(), *PAGE_SIZE_RANGE.end());
        self.pagination.set_page_size(page_size);
    }

    /// Change grid columns (clamped to the allowed range); back to page 1
    pub fn set_grid_columns(&mut self, columns: usize) {
        self.grid_columns = columns.clamp(*GRID_COLUMNS_RANGE.start(), *GRID_COLUMNS_RANGE.end());
        self.pagination.reset();
    }

    /// Thumbnails for the current page.
    ///
    /// Misses are decoded synchronously; entries that fail to decode are
    /// left out and the rest of the page still renders.
    pub fn render_page(&mut self) -> Vec<GridCell> {
        let page: Vec<(EntryId, PathBuf, String, String)> = self
            .current_page_entries()
            .into_iter()
            .map(|(id, entry)| (id, entry.path().to_path_buf(), entry.filename(), caption(entry)))
            .collect();

        let cells: Vec<GridCell> = page
            .into_iter()
            .filter_map(|(id, path, filename, caption)| {
                self.thumbnails
                    .get(&path)
                    .ok()
                    .map(|thumbnail| GridCell {
                        id,
                        filename,
                        caption,
                        thumbnail,
                    })
            })
            .collect();

        debug!(
            "Rendered page {} ({} cells, {} thumbnails cached, {} decodes so far)",
            self.current_page(),
            cells.len(),
            self.thumbnails.len(),
            self.thumbnails.decode_count()
        );
        cells
    }

    #[cfg(test)]
    pub fn thumbnails(&self) -> &ThumbnailCache {
        &self.thumbnails
    }

    #[cfg(test)]
    pub fn thumbnails_mut(&mut self) -> &mut ThumbnailCache {
        &mut self.thumbnails
    }

    // ========== Viewer ==========

    /// Open the full-resolution viewer for an entry, replacing any open one.
    ///
    /// On decode failure the previous viewer (if any) stays as it was.
    pub fn open_viewer(&mut self, id: EntryId) -> Result<&Viewport> {
        let path = self.entry_path(id)?;
        let viewport = Viewport::open(&path, self.frame_limits)?;
        Ok(self.viewport.insert(viewport))
    }

    pub fn close_viewer(&mut self) {
        self.viewport = None;
    }

    pub fn viewer(&self) -> Option<&Viewport> {
        self.viewport.as_ref()
    }

    pub fn viewer_mut(&mut self) -> Option<&mut Viewport> {
        self.viewport.as_mut()
    }

    /// Path of an entry in the current library
    pub fn entry_path(&self, id: EntryId) -> Result<PathBuf> {
        self.library
            .get(id)
            .map(|entry| entry.path().to_path_buf())
            .ok_or_else(|| {
                warn!("Unknown entry id {id}");
                Error::NotFound(PathBuf::from(format!("entry #{id}")))
            })
    }
}

fn caption(entry: &PhotoEntry) -> String {
    let date = entry.date().format("%Y-%m-%d");
    match entry.source() {
        TimestampSource::CaptureDate => date.to_string(),
        TimestampSource::Modified => format!("{date} (modified)"),
    }
}
