use crate::errors::SearchError;
use crate::types::SearchResult;
use serde::Serialize;

/// Validated page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    limit: i64,
    page: i64,
    offset: i64,
}

impl Pagination {
    /// `page` is zero-based; `max_limit` is the entity's page size ceiling.
    pub fn new(limit: i64, page: i64, max_limit: i64) -> Result<Self, SearchError> {
        if limit < 1 {
            return Err(SearchError::InvalidPagination(format!(
                "limit must be at least 1, got {}",
                limit
            )));
        }
        if limit > max_limit {
            return Err(SearchError::InvalidPagination(format!(
                "limit must be at most {}, got {}",
                max_limit, limit
            )));
        }
        if page < 0 {
            return Err(SearchError::InvalidPagination(format!(
                "page must be non-negative, got {}",
                page
            )));
        }
        let offset = page.checked_mul(limit).ok_or_else(|| {
            SearchError::InvalidPagination(format!("page {} is out of range", page))
        })?;
        Ok(Self {
            limit,
            page,
            offset,
        })
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }
}

/// Number of pages needed for `total` rows, `0` when `limit` is not positive.
pub fn page_count(total: i64, limit: i64) -> i64 {
    if limit > 0 {
        (total + limit - 1) / limit
    } else {
        0
    }
}

/// Response body for paginated listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub pages: i64,
    pub current_page: i64,
    pub limit: i64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(result: SearchResult<T>, page: i64, limit: i64) -> Self {
        Self {
            pages: page_count(result.total, limit),
            items: result.items,
            total: result.total,
            current_page: page,
            limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset() {
        let p = Pagination::new(20, 3, 100).unwrap();
        assert_eq!(p.offset(), 60);
        assert_eq!(p.limit(), 20);
        assert_eq!(p.page(), 3);
        assert_eq!(Pagination::new(5000, 0, 5000).unwrap().offset(), 0);
    }

    #[test]
    fn test_rejects_bad_windows() {
        for (limit, page) in [(0, 0), (-1, 0), (101, 0), (10, -1), (100, i64::MAX)] {
            assert!(
                matches!(
                    Pagination::new(limit, page, 100),
                    Err(SearchError::InvalidPagination(_))
                ),
                "limit={} page={}",
                limit,
                page
            );
        }
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(150, 20), 8);
        assert_eq!(page_count(160, 20), 8);
        assert_eq!(page_count(0, 20), 0);
        assert_eq!(page_count(1, 20), 1);
        assert_eq!(page_count(10, 0), 0);
    }

    #[test]
    fn test_envelope_serialization() {
        let result = SearchResult {
            items: vec!["a", "b"],
            total: 150,
        };
        let response = PaginatedResponse::new(result, 0, 20);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "items": ["a", "b"],
                "total": 150,
                "pages": 8,
                "current_page": 0,
                "limit": 20
            })
        );
    }
}
