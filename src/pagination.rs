//! Fixed-size page slicing over the in-memory record list.

use serde::Serialize;

/// Records shown per listing page (a 3x3 grid).
pub const PAGE_SIZE: usize = 9;

/// Page count for `len` records, never less than one.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1)).max(1)
}

/// Slices the 1-based `page` out of `records`.
///
/// Out-of-range pages yield fewer or zero items rather than an error.
pub fn paginate<T>(records: &[T], page: usize, page_size: usize) -> (&[T], usize) {
    let page_size = page_size.max(1);
    let total = total_pages(records.len(), page_size);
    if page == 0 {
        return (&records[..0], total);
    }
    let start = (page - 1).saturating_mul(page_size).min(records.len());
    let end = page.saturating_mul(page_size).min(records.len());
    (&records[start..end], total)
}

/// Current position within a paged list, always inside `[1, total_pages]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pager {
    page: usize,
    total_pages: usize,
}

impl Pager {
    /// Clamps `requested` into the valid page range for `len` records.
    pub fn new(requested: usize, len: usize, page_size: usize) -> Self {
        let total_pages = total_pages(len, page_size);
        Self {
            page: requested.clamp(1, total_pages),
            total_pages,
        }
    }

    /// Current 1-based page.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Total page count.
    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Whether a later page exists.
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Whether an earlier page exists.
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Target of a "next" click, clamped to the last page.
    pub fn next_page(&self) -> usize {
        (self.page + 1).min(self.total_pages)
    }

    /// Target of a "previous" click, clamped to the first page.
    pub fn previous_page(&self) -> usize {
        self.page.saturating_sub(1).max(1)
    }

    /// `next_page` when it differs from the current page.
    pub fn next(&self) -> Option<usize> {
        self.has_next().then(|| self.next_page())
    }

    /// `previous_page` when it differs from the current page.
    pub fn previous(&self) -> Option<usize> {
        self.has_previous().then(|| self.previous_page())
    }

    /// Clamps an arbitrary page number into `[1, total_pages]`.
    pub fn clamp(&self, page: usize) -> usize {
        page.clamp(1, self.total_pages)
    }

    /// Slice of `records` for the current page.
    pub fn slice<'a, T>(&self, records: &'a [T], page_size: usize) -> &'a [T] {
        paginate(records, self.page, page_size).0
    }
}
