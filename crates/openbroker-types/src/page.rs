//! Offset pagination for read-only projections.

use serde::{Deserialize, Serialize};

use crate::constants;

/// Zero-based page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: usize,
    pub size: usize,
}

impl PageRequest {
    #[must_use]
    pub fn new(page: usize, size: usize) -> Self {
        Self { page, size }
    }

    /// Clamp the page size into `1..=max_size`.
    #[must_use]
    pub fn clamped(self, max_size: usize) -> Self {
        Self {
            page: self.page,
            size: self.size.clamp(1, max_size.max(1)),
        }
    }

    #[must_use]
    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: constants::DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of results plus the total number of matching items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub size: usize,
    pub total: usize,
}

impl<T> Page<T> {
    /// Cut a page out of an already sorted result set.
    #[must_use]
    pub fn from_sorted(all: Vec<T>, request: PageRequest) -> Self {
        let total = all.len();
        let items = all
            .into_iter()
            .skip(request.offset())
            .take(request.size)
            .collect();
        Self {
            items,
            page: request.page,
            size: request.size,
            total,
        }
    }

    #[must_use]
    pub fn total_pages(&self) -> usize {
        if self.size == 0 {
            0
        } else {
            self.total.div_ceil(self.size)
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_requested_page() {
        let page = Page::from_sorted((1..=25).collect::<Vec<_>>(), PageRequest::new(1, 10));
        assert_eq!(page.items, (11..=20).collect::<Vec<_>>());
        assert_eq!(page.total, 25);
        assert_eq!(page.total_pages(), 3);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let page = Page::from_sorted(vec![1, 2, 3], PageRequest::new(5, 10));
        assert!(page.is_empty());
        assert_eq!(page.total, 3);
    }

    #[test]
    fn clamp_bounds_size() {
        assert_eq!(PageRequest::new(0, 0).clamped(100).size, 1);
        assert_eq!(PageRequest::new(0, 500).clamped(100).size, 100);
    }
}
