//! Pagination types for list operations.

use serde::{Deserialize, Serialize};

/// Default page size.
pub const DEFAULT_PAGE_SIZE: u64 = 10;
/// Maximum page size.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-based).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Number of items per page.
    #[serde(default = "default_limit")]
    pub limit: u64,
}

impl PageRequest {
    /// Create a new page request, clamping out-of-range values.
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Number of records to skip. Saturates for absurd page numbers.
    pub fn skip(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Pagination block of a listing response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Total number of items across all pages.
    pub total_items: u64,
    /// Total number of pages.
    pub total_pages: u64,
    /// Current page number (1-based).
    pub current_page: u64,
    /// Number of items per page.
    pub limit: u64,
}

/// Paginated response wrapper: `{data, pagination}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    /// The items on this page.
    pub data: Vec<T>,
    /// Totals and position.
    pub pagination: PageMeta,
}

impl<T> PageResponse<T> {
    /// Create a new paginated response.
    pub fn new(data: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        let total_pages = total_items.div_ceil(request.limit.max(1));
        Self {
            data,
            pagination: PageMeta {
                total_items,
                total_pages,
                current_page: request.page,
                limit: request.limit,
            },
        }
    }
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    DEFAULT_PAGE_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_is_zero_based() {
        assert_eq!(PageRequest::new(1, 10).skip(), 0);
        assert_eq!(PageRequest::new(3, 10).skip(), 20);
        assert_eq!(PageRequest::new(0, 10).skip(), 0);
    }

    #[test]
    fn test_skip_saturates_on_huge_pages() {
        assert_eq!(PageRequest::new(u64::MAX, MAX_PAGE_SIZE).skip(), u64::MAX);
    }

    #[test]
    fn test_limit_is_clamped() {
        assert_eq!(PageRequest::new(1, 0).limit, 1);
        assert_eq!(PageRequest::new(1, 1_000).limit, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let page = PageResponse::new(vec![1, 2, 3], PageRequest::new(1, 10), 21);
        assert_eq!(page.pagination.total_pages, 3);
        let empty: PageResponse<u8> = PageResponse::new(vec![], PageRequest::default(), 0);
        assert_eq!(empty.pagination.total_pages, 0);
    }

    #[test]
    fn test_meta_serializes_camel_case() {
        let page: PageResponse<u8> = PageResponse::new(vec![], PageRequest::new(2, 5), 7);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["pagination"]["totalItems"], 7);
        assert_eq!(json["pagination"]["currentPage"], 2);
        assert_eq!(json["pagination"]["totalPages"], 2);
    }
}
