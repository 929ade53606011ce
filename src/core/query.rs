//! Paging utilities for slicing an ordered collection into a visible window

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Default number of items on one page
pub const DEFAULT_ITEMS_PER_PAGE: usize = 20;

/// Which page of an ordered sequence to show
///
/// Pages are 0-indexed. The window for page `p` with size `n` is
/// `[p * n, p * n + n)`, clipped to the sequence length.
///
/// # Example
/// ```rust,ignore
/// let request = PageRequest::new(1, 2);
/// let page = request.slice(&["a", "b", "c"]);
/// assert_eq!(page.items, vec![&"c"]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageRequest {
    /// Page number (starts at 0)
    pub page: usize,

    /// Number of items per page
    pub items_per_page: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
        }
    }
}

impl PageRequest {
    pub fn new(page: usize, items_per_page: usize) -> Self {
        Self {
            page,
            items_per_page,
        }
    }

    /// Get the page size, ensuring minimum of 1
    pub fn items_per_page(&self) -> usize {
        self.items_per_page.max(1)
    }

    /// Index range of this page within a sequence of `total` items
    pub fn window(&self, total: usize) -> Range<usize> {
        let size = self.items_per_page();
        let begin = self.page.saturating_mul(size).min(total);
        let end = begin.saturating_add(size).min(total);
        begin..end
    }

    /// Select this page out of an ordered slice
    pub fn slice<'a, T>(&self, items: &'a [T]) -> Page<&'a T> {
        self.collect(items.iter(), items.len())
    }

    /// Select this page out of an ordered iterator of known length
    pub fn collect<T>(&self, items: impl Iterator<Item = T>, total: usize) -> Page<T> {
        let window = self.window(total);
        let items = items
            .skip(window.start)
            .take(window.end - window.start)
            .collect();

        Page {
            items,
            meta: PaginationMeta::new(self.page, self.items_per_page(), total),
        }
    }
}

/// One page of items plus metadata about where it sits
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    /// The items of this page, in collection order
    pub items: Vec<T>,

    /// Pagination metadata
    pub meta: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    /// Current page number (starts at 0)
    pub page: usize,

    /// Number of items per page
    pub items_per_page: usize,

    /// Total number of items
    pub total: usize,

    /// Total number of pages
    pub total_pages: usize,

    /// Whether there is a next page
    pub has_next: bool,

    /// Whether there is a previous page
    pub has_prev: bool,
}

impl PaginationMeta {
    pub fn new(page: usize, items_per_page: usize, total: usize) -> Self {
        let items_per_page = items_per_page.max(1);
        let total_pages = total.div_ceil(items_per_page);

        Self {
            page,
            items_per_page,
            total,
            total_pages,
            has_next: page.saturating_add(1) < total_pages,
            has_prev: page > 0,
        }
    }
}
