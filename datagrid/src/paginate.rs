//! Client-side pagination over the visible rows.

use std::ops::Range;

/// Requested page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page_index: usize,
    pub page_size: usize,
}

impl Pagination {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_index: 0,
            page_size,
        }
    }
}

/// Resolved page: which slice of the visible rows to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSlice {
    pub range: Range<usize>,
    /// Requested index clamped to the last page.
    pub page_index: usize,
    /// At least 1, even for an empty row set.
    pub page_count: usize,
}

impl PageSlice {
    pub fn has_previous(&self) -> bool {
        self.page_index > 0
    }

    pub fn has_next(&self) -> bool {
        self.page_index + 1 < self.page_count
    }
}

/// Resolve a page over `len` rows.
pub fn paginate(len: usize, pagination: &Pagination) -> PageSlice {
    let size = pagination.page_size.max(1);
    let page_count = len.div_ceil(size).max(1);
    let page_index = pagination.page_index.min(page_count - 1);
    let start = (page_index * size).min(len);
    let end = (start + size).min(len);
    PageSlice {
        range: start..end,
        page_index,
        page_count,
    }
}
