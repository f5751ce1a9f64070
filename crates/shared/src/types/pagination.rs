//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Largest page size a client may request.
pub const MAX_PER_PAGE: u32 = 100;

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-indexed).
    #[serde(default = "default_page")]
    pub page: u32,
    /// Number of items per page.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl PageRequest {
    /// Returns a copy with page and page size forced into their valid ranges.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            page: self.page.max(1),
            per_page: self.per_page.clamp(1, MAX_PER_PAGE),
        }
    }

    /// Calculates the offset for database queries.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }

    /// Returns the limit for database queries.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.per_page)
    }
}

/// Response wrapper for paginated data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    /// The items in the current page.
    pub data: Vec<T>,
    /// Pagination metadata.
    pub meta: PageMeta,
}

/// Pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMeta {
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Total number of items across all pages.
    pub total: u64,
    /// Total number of pages.
    pub total_pages: u64,
}

impl<T> PageResponse<T> {
    /// Creates a new paginated response.
    #[must_use]
    pub fn new(data: Vec<T>, page: u32, per_page: u32, total: u64) -> Self {
        let total_pages = if total == 0 || per_page == 0 {
            1
        } else {
            total.div_ceil(u64::from(per_page))
        };

        Self {
            data,
            meta: PageMeta {
                page,
                per_page,
                total,
                total_pages,
            },
        }
    }

    /// Maps the items while keeping the metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResponse<U> {
        PageResponse {
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_default() {
        let request = PageRequest::default();
        assert_eq!(request.page, 1);
        assert_eq!(request.per_page, 20);
    }

    #[test]
    fn test_page_request_offset() {
        let request = PageRequest { page: 1, per_page: 20 };
        assert_eq!(request.offset(), 0);

        let request = PageRequest { page: 3, per_page: 20 };
        assert_eq!(request.offset(), 40);
    }

    #[test]
    fn test_normalized_clamps() {
        let request = PageRequest { page: 0, per_page: 5000 }.normalized();
        assert_eq!(request.page, 1);
        assert_eq!(request.per_page, MAX_PER_PAGE);

        let request = PageRequest { page: 2, per_page: 0 }.normalized();
        assert_eq!(request.per_page, 1);
    }

    #[test]
    fn test_page_response_pagination() {
        // 25 items, 10 per page -> 3 pages
        let response: PageResponse<i32> = PageResponse::new(vec![], 1, 10, 25);
        assert_eq!(response.meta.total_pages, 3);

        let response: PageResponse<i32> = PageResponse::new(vec![], 1, 10, 0);
        assert_eq!(response.meta.total_pages, 1);
    }

    #[test]
    fn test_page_response_map() {
        let response = PageResponse::new(vec![1, 2, 3], 1, 10, 3).map(|n| n * 2);
        assert_eq!(response.data, vec![2, 4, 6]);
        assert_eq!(response.meta.total, 3);
    }
}
