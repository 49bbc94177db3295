//! Page/size/sort query parameters and pagination response headers.
//!
//! List endpoints accept `?page=`, `?size=`, and `?sort=field,direction`
//! query parameters and expose the total number of matching records in an
//! `X-Total-Count` response header alongside the page body.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use utoipa::IntoParams;

/// Header carrying the total number of records across all pages.
pub const X_TOTAL_COUNT: &str = "x-total-count";

/// Default page size when the client does not specify one.
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Upper bound on page size, so clients cannot request unbounded result sets.
pub const MAX_PAGE_SIZE: u64 = 100;

fn default_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

/// Pagination and sorting query parameters.
///
/// `page` is zero-based. `sort` takes the form `field` or `field,asc` /
/// `field,desc`; which fields are sortable is up to the endpoint.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Zero-based page index
    #[serde(default)]
    pub page: u64,

    /// Number of records per page (capped at 100)
    #[serde(default = "default_size")]
    pub size: u64,

    /// Sort specification, e.g. `title,asc` or `createdAt,desc`
    #[serde(default)]
    pub sort: Option<String>,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: None,
        }
    }
}

impl PageParams {
    /// Effective page size after clamping to [1, MAX_PAGE_SIZE].
    pub fn limit(&self) -> u64 {
        self.size.clamp(1, MAX_PAGE_SIZE)
    }

    /// Offset of the first record on this page.
    ///
    /// Saturates instead of overflowing for absurd page numbers; such a
    /// page is empty either way.
    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.limit())
    }

    /// Parse the sort specification into a field name and direction.
    ///
    /// Returns `None` when no sort was requested. An omitted or
    /// unrecognized direction defaults to ascending.
    pub fn sort_spec(&self) -> Option<(&str, SortDirection)> {
        let sort = self.sort.as_deref()?.trim();
        if sort.is_empty() {
            return None;
        }

        match sort.split_once(',') {
            Some((field, direction)) => {
                let direction = match direction.trim().to_ascii_lowercase().as_str() {
                    "desc" => SortDirection::Desc,
                    _ => SortDirection::Asc,
                };
                Some((field.trim(), direction))
            }
            None => Some((sort, SortDirection::Asc)),
        }
    }
}

/// Sort direction for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// One page of results plus the total record count across all pages.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64) -> Self {
        Self { items, total }
    }

    /// Map the items of this page, keeping the total intact.
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}

/// Build the pagination response headers for a total record count.
pub fn pagination_headers(total: u64) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&total.to_string()) {
        headers.insert(HeaderName::from_static(X_TOTAL_COUNT), value);
    }
    headers
}
