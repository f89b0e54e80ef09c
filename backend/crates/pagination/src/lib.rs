//! Page-number pagination primitives shared by listing endpoints.
//!
//! Listing endpoints accept `page` and `limit` from untrusted query strings.
//! [`PageRequest::from_query`] coerces them permissively: anything that is not
//! a positive integer falls back to the first page or to the endpoint's
//! default page size. [`PageMeta`] describes the resulting window together
//! with the total match count, and [`Paginated`] pairs it with the items of
//! the window.
//!
//! # Examples
//!
//! ```
//! use pagination::{PageMeta, PageRequest};
//!
//! let request = PageRequest::from_query(Some("2"), Some("5"), 9);
//! assert_eq!(request.skip(), 5);
//!
//! let meta = PageMeta::new(request, 12);
//! assert_eq!(meta.total_pages, 3);
//! ```

use serde::{Deserialize, Serialize};

/// Number of the first page. Pages are one-based.
pub const FIRST_PAGE: u64 = 1;

/// Errors raised when a page request is built from explicit values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    /// The page number was zero.
    #[error("page must be a positive integer")]
    ZeroPage,
    /// The page size was zero.
    #[error("limit must be a positive integer")]
    ZeroLimit,
}

/// A validated page window: one-based page number and page size.
///
/// ## Invariants
/// - `page >= 1`
/// - `limit >= 1`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    page: u64,
    limit: u64,
}

impl PageRequest {
    /// Build a page request from explicit values.
    ///
    /// # Errors
    ///
    /// Returns [`PageRequestError`] when either value is zero.
    pub const fn new(page: u64, limit: u64) -> Result<Self, PageRequestError> {
        if page == 0 {
            return Err(PageRequestError::ZeroPage);
        }
        if limit == 0 {
            return Err(PageRequestError::ZeroLimit);
        }
        Ok(Self { page, limit })
    }

    /// Coerce untrusted query-string values into a page request.
    ///
    /// Absent, blank, non-numeric, zero and negative values never fail; they
    /// fall back to [`FIRST_PAGE`] and `default_limit` respectively. A zero
    /// `default_limit` is treated as one. No upper bound is applied to the
    /// page size.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagination::PageRequest;
    ///
    /// let request = PageRequest::from_query(Some("-4"), Some("abc"), 10);
    /// assert_eq!(request.page(), 1);
    /// assert_eq!(request.limit(), 10);
    /// ```
    #[must_use]
    pub fn from_query(page: Option<&str>, limit: Option<&str>, default_limit: u64) -> Self {
        Self {
            page: coerce_positive(page).unwrap_or(FIRST_PAGE),
            limit: coerce_positive(limit).unwrap_or(default_limit.max(1)),
        }
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u64 {
        self.page
    }

    /// Page size.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.limit
    }

    /// Number of matching records that precede this page.
    #[must_use]
    pub const fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Number of records this page holds when `total` records match.
    ///
    /// Equals `min(limit, total - skip)` while `skip < total`, else zero.
    #[must_use]
    pub fn window_len(&self, total: u64) -> u64 {
        total.saturating_sub(self.skip()).min(self.limit)
    }
}

/// Parse a strictly positive integer from an optional query value.
///
/// Surrounding whitespace is ignored; anything else that is not a base-10
/// integer greater than zero yields `None`.
#[must_use]
pub fn coerce_positive(raw: Option<&str>) -> Option<u64> {
    raw.map(str::trim)
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
}

/// Pagination metadata returned alongside a page of listing results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Count of all records matching the filter, ignoring pagination.
    pub total: u64,
    /// One-based page number that was served.
    pub page: u64,
    /// Page size that was applied.
    pub limit: u64,
    /// `ceil(total / limit)`.
    pub total_pages: u64,
}

impl PageMeta {
    /// Describe `request` for a listing with `total` matches.
    #[must_use]
    pub const fn new(request: PageRequest, total: u64) -> Self {
        Self {
            total,
            page: request.page,
            limit: request.limit,
            total_pages: total.div_ceil(request.limit),
        }
    }
}

/// One page of listing results with its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    /// Records in the requested window, in listing order.
    pub items: Vec<T>,
    /// Window description and totals.
    pub meta: PageMeta,
}

impl<T> Paginated<T> {
    /// Pair a page of items with metadata derived from `request` and `total`.
    #[must_use]
    pub const fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            items,
            meta: PageMeta::new(request, total),
        }
    }

    /// Convert every item while keeping the metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, 1)]
    #[case(Some(""), 1)]
    #[case(Some("   "), 1)]
    #[case(Some("abc"), 1)]
    #[case(Some("0"), 1)]
    #[case(Some("-2"), 1)]
    #[case(Some("2.5"), 1)]
    #[case(Some("3"), 3)]
    #[case(Some(" 7 "), 7)]
    fn page_falls_back_to_first_page(#[case] raw: Option<&str>, #[case] expected: u64) {
        let request = PageRequest::from_query(raw, None, 9);
        assert_eq!(request.page(), expected);
    }

    #[rstest]
    #[case(None, 9)]
    #[case(Some("nine"), 9)]
    #[case(Some("0"), 9)]
    #[case(Some("-1"), 9)]
    #[case(Some("25"), 25)]
    #[case(Some("1000"), 1000)]
    fn limit_falls_back_to_default(#[case] raw: Option<&str>, #[case] expected: u64) {
        let request = PageRequest::from_query(None, raw, 9);
        assert_eq!(request.limit(), expected);
    }

    #[rstest]
    fn zero_default_limit_is_treated_as_one() {
        let request = PageRequest::from_query(None, None, 0);
        assert_eq!(request.limit(), 1);
    }

    #[rstest]
    #[case(1, 10, 0)]
    #[case(2, 5, 5)]
    #[case(4, 9, 27)]
    fn skip_is_previous_pages_times_limit(
        #[case] page: u64,
        #[case] limit: u64,
        #[case] expected: u64,
    ) {
        let request = PageRequest::new(page, limit).expect("valid request");
        assert_eq!(request.skip(), expected);
    }

    #[rstest]
    fn new_rejects_zero_values() {
        assert_eq!(PageRequest::new(0, 5), Err(PageRequestError::ZeroPage));
        assert_eq!(PageRequest::new(1, 0), Err(PageRequestError::ZeroLimit));
    }

    #[rstest]
    #[case(0, 9, 0)]
    #[case(1, 9, 1)]
    #[case(9, 9, 1)]
    #[case(10, 9, 2)]
    #[case(12, 5, 3)]
    fn total_pages_rounds_up(#[case] total: u64, #[case] limit: u64, #[case] expected: u64) {
        let request = PageRequest::new(1, limit).expect("valid request");
        assert_eq!(PageMeta::new(request, total).total_pages, expected);
    }

    #[rstest]
    fn meta_serialises_in_camel_case() {
        let request = PageRequest::new(2, 5).expect("valid request");
        let value = serde_json::to_value(PageMeta::new(request, 12)).expect("serialise meta");
        assert_eq!(
            value,
            serde_json::json!({ "total": 12, "page": 2, "limit": 5, "totalPages": 3 })
        );
    }

    #[rstest]
    fn map_preserves_meta() {
        let request = PageRequest::new(1, 2).expect("valid request");
        let page = Paginated::new(vec![1_u32, 2], request, 4).map(|n| n.to_string());
        assert_eq!(page.items, vec!["1".to_owned(), "2".to_owned()]);
        assert_eq!(page.meta.total_pages, 2);
    }
}
