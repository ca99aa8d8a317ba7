// src/models/pagination.rs
// DOCUMENTATION: Offset and keyset pagination helpers
// PURPOSE: Normalize page/limit query parameters the same way for every list endpoint

use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;
/// Keeps `page * limit` inside i64 for any accepted limit
pub const MAX_PAGE: i64 = 1_000_000;

/// Normalized page request (1 <= page <= MAX_PAGE, 1 <= limit <= 100)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: i64,
    pub limit: i64,
}

impl PageParams {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).clamp(1, MAX_PAGE),
            limit: clamp_limit(limit),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }

    pub fn paginate(&self, total: i64) -> Pagination {
        let total_pages = total / self.limit + i64::from(total % self.limit != 0);
        Pagination {
            page: self.page,
            limit: self.limit,
            total,
            total_pages,
            has_more: total > self.page * self.limit,
        }
    }
}

pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
}

/// Pagination metadata returned next to list data
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
    pub has_more: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_clamping() {
        assert_eq!(PageParams::new(None, None), PageParams { page: 1, limit: 20 });
        assert_eq!(PageParams::new(Some(0), Some(500)), PageParams { page: 1, limit: 100 });
        assert_eq!(PageParams::new(Some(-3), Some(0)), PageParams { page: 1, limit: 1 });
    }

    #[test]
    fn test_offset_and_metadata() {
        let params = PageParams::new(Some(3), Some(10));
        assert_eq!(params.offset(), 20);

        let meta = params.paginate(45);
        assert_eq!(meta.total_pages, 5);
        assert!(meta.has_more);

        let last = PageParams::new(Some(5), Some(10)).paginate(45);
        assert!(!last.has_more);

        let empty = PageParams::new(None, None).paginate(0);
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_more);
    }

    #[test]
    fn test_huge_page_is_clamped() {
        let params = PageParams::new(Some(i64::MAX), Some(100));
        assert_eq!(params.page, MAX_PAGE);
        assert_eq!(params.offset(), (MAX_PAGE - 1) * 100);

        let meta = params.paginate(i64::MAX - 1);
        assert!(meta.has_more);
    }
}
