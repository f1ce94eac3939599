//! Page-number pagination for list endpoints.
//!
//! Pages are 1-based. Missing or non-positive values fall back to the
//! defaults rather than failing the request.

/// Page used when the caller omits one or sends a non-positive value.
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when the caller omits one or sends a non-positive value.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// A normalised page request, ready to become `LIMIT` / `OFFSET`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub size: i64,
}

impl PageRequest {
    pub fn new(page: Option<i64>, size: Option<i64>) -> Self {
        let page = page.filter(|p| *p > 0).unwrap_or(DEFAULT_PAGE);
        let size = size.filter(|s| *s > 0).unwrap_or(DEFAULT_PAGE_SIZE);
        Self { page, size }
    }

    pub fn limit(&self) -> i64 {
        self.size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}
