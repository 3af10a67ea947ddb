use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

/// Upper bound on requested page sizes. Larger values are clamped, not rejected.
pub const MAX_PAGE_SIZE: i32 = 50;
pub const DEFAULT_PAGE_SIZE: i32 = 10;

fn default_page_number() -> i32 {
    1
}

fn default_page_size() -> i32 {
    DEFAULT_PAGE_SIZE
}

/// Query string parameters for paginated listings.
///
/// The wire names are PascalCase (`PageNumber`, `PageSize`) to match the
/// existing client contract. The page number keeps whatever value the client
/// sent; only the page size is clamped.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "PascalCase")]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    #[serde(default = "default_page_number")]
    pub page_number: i32,

    #[serde(default = "default_page_size")]
    page_size: i32,
}

impl PageParams {
    pub fn new(page_number: i32, page_size: i32) -> Self {
        Self { page_number, page_size }
    }

    /// Requested page size clamped to `[0, MAX_PAGE_SIZE]`.
    pub fn page_size(&self) -> i32 {
        self.page_size.clamp(0, MAX_PAGE_SIZE)
    }

    /// Row offset for the requested page. Page numbers below 1 skip nothing.
    pub fn offset(&self) -> i64 {
        // Widen before subtracting so extreme client-supplied page numbers
        // cannot overflow i32
        (i64::from(self.page_number) - 1).max(0) * i64::from(self.page_size())
    }
}

impl Default for PageParams {
    fn default() -> Self {
        Self::new(default_page_number(), default_page_size())
    }
}

/// One page of an ordered query plus total-count metadata. Built fresh per
/// query, never persisted.
#[derive(Debug, Clone)]
pub struct PagedList<T> {
    pub items: Vec<T>,
    pub total_count: i64,
    pub current_page: i32,
    pub page_size: i32,
    pub total_pages: i32,
}

impl<T> PagedList<T> {
    pub fn new(items: Vec<T>, total_count: i64, current_page: i32, page_size: i32) -> Self {
        let total_pages = if page_size <= 0 {
            0
        } else {
            ((total_count + i64::from(page_size) - 1) / i64::from(page_size)) as i32
        };

        Self {
            items,
            total_count,
            current_page,
            page_size,
            total_pages,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn metadata(&self) -> PageMetadata {
        PageMetadata {
            total_count: self.total_count,
            page_size: self.page_size,
            current_page: self.current_page,
            total_pages: self.total_pages,
            has_next: self.has_next(),
            has_previous: self.has_previous(),
        }
    }
}

/// Serialized into the `X-Pagination` response header. PascalCase keys match
/// the existing client contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct PageMetadata {
    pub total_count: i64,
    pub page_size: i32,
    pub current_page: i32,
    pub total_pages: i32,
    pub has_next: bool,
    pub has_previous: bool,
}
