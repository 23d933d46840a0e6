/// Date filtering and pagination over a loaded library
///
/// The filtered view always preserves library order; pages are fixed-size
/// slices of that view.
use chrono::NaiveDate;

use super::data::{EntryId, Library, PhotoEntry};
use crate::error::{Error, Result};

/// Filter input layout, e.g. "2021-03-04"
const FILTER_DATE_FORMAT: &str = "%Y-%m-%d";

/// Optional calendar date the view is restricted to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateFilter {
    date: Option<NaiveDate>,
}

impl DateFilter {
    /// Parse filter text. Empty (or blank) text means "no filter".
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Self::default());
        }

        NaiveDate::parse_from_str(text, FILTER_DATE_FORMAT)
            .map(|date| Self { date: Some(date) })
            .map_err(|_| Error::InvalidDate(text.to_string()))
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    #[cfg(test)]
    pub fn is_active(&self) -> bool {
        self.date.is_some()
    }

    pub fn matches(&self, entry: &PhotoEntry) -> bool {
        self.date.map_or(true, |date| entry.date() == date)
    }
}

/// Entries of `library` passing `filter`, in library order, paired with their ids
pub fn effective_view<'a>(library: &'a Library, filter: &DateFilter) -> Vec<(EntryId, &'a PhotoEntry)> {
    library
        .entries()
        .iter()
        .enumerate()
        .filter(|(_, entry)| filter.matches(entry))
        .collect()
}

/// `max(1, ceil(count / page_size))`
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1)).max(1)
}

/// Slice out page `n` (1-based) after clamping it into `[1, total_pages]`
pub fn page<T>(view: &[T], page_size: usize, n: usize) -> &[T] {
    let page_size = page_size.max(1);
    let n = n.clamp(1, total_pages(view.len(), page_size));
    let start = ((n - 1) * page_size).min(view.len());
    let end = (start + page_size).min(view.len());
    &view[start..end]
}

/// Page size and the 1-based current page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page_size: usize,
    current_page: usize,
}

impl Pagination {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            current_page: 1,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self, count: usize) -> usize {
        total_pages(count, self.page_size)
    }

    /// Change the page size and go back to the first page
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.current_page = 1;
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Advance one page. Returns false (no-op) on the last page.
    pub fn next_page(&mut self, count: usize) -> bool {
        if self.current_page < self.total_pages(count) {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    /// Go back one page. Returns false (no-op) on the first page.
    pub fn prev_page(&mut self) -> bool {
        if self.current_page > 1 {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    /// The current page of `view`
    pub fn slice<'a, T>(&self, view: &'a [T]) -> &'a [T] {
        page(view, self.page_size, self.current_page)
    }
}
