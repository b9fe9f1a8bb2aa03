//! Pagination types for list queries

use serde::{Deserialize, Serialize};

/// Pagination parameters for list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Page number (1-indexed)
    pub page: u32,
    /// Number of items per page
    pub per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 5,
        }
    }
}

impl Pagination {
    /// Create pagination parameters, clamping page to >= 1 and
    /// per_page to `1..=max_per_page`.
    pub fn new(page: u32, per_page: u32, max_per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, max_per_page.max(1)),
        }
    }

    /// Calculate the offset for database queries
    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.per_page)
    }

    /// Get the limit for database queries
    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }
}

/// Paginated result container
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResult<T> {
    /// Items in the current page
    pub items: Vec<T>,
    /// Total number of matching items across all pages
    pub total: i64,
    /// Pagination used to produce this page
    pub pagination: Pagination,
}

impl<T> PagedResult<T> {
    pub fn new(items: Vec<T>, total: i64, pagination: Pagination) -> Self {
        Self {
            items,
            total,
            pagination,
        }
    }

    /// Number of the last page (0 when there are no items)
    pub fn last_page(&self) -> i64 {
        let per_page = i64::from(self.pagination.per_page);
        if per_page == 0 {
            return 0;
        }
        (self.total + per_page - 1) / per_page
    }

    /// Transform the items while keeping the page window
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedResult<U> {
        PagedResult {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            pagination: self.pagination,
        }
    }
}
