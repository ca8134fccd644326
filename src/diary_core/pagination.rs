//! Page/limit normalization and the pagination envelope.

use crate::constants::{DEFAULT_PAGE, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use serde::Serialize;

/// A normalized page request, safe to hand to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u64,
    /// Page size, always within `1..=100`.
    pub limit: u64,
    /// Number of records to skip before this page.
    pub skip: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        normalize_pagination(None, None)
    }
}

/// One page of results plus the counts needed to navigate the rest.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> Page<T> {
    /// Transforms every item while keeping the page counts.
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
            has_next: self.has_next,
            has_prev: self.has_prev,
        }
    }
}

/// Normalizes raw page/limit inputs.
///
/// Missing values default to page 1 and limit 10. The page is floored at 1 and
/// the limit clamped to `1..=100`.
///
/// # Examples
///
/// ```
/// use daybook::diary_core::pagination::normalize_pagination;
///
/// let req = normalize_pagination(Some(3), Some(500));
/// assert_eq!((req.page, req.limit, req.skip), (3, 100, 200));
/// ```
pub fn normalize_pagination(page: Option<i64>, limit: Option<i64>) -> PageRequest {
    let page = page.unwrap_or(DEFAULT_PAGE).max(1) as u64;
    let limit = limit
        .unwrap_or(DEFAULT_PAGE_LIMIT)
        .clamp(1, MAX_PAGE_LIMIT) as u64;

    PageRequest {
        page,
        limit,
        skip: (page - 1).saturating_mul(limit),
    }
}

/// Wraps a page of data with navigation metadata.
pub fn build_pagination_result<T>(data: Vec<T>, total: u64, request: &PageRequest) -> Page<T> {
    let total_pages = total.div_ceil(request.limit);

    Page {
        data,
        total,
        page: request.page,
        limit: request.limit,
        total_pages,
        has_next: request.page < total_pages,
        has_prev: request.page > 1,
    }
}
