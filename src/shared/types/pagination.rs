//! Offset pagination: request normalization and page bounds.

use serde::Serialize;
use utoipa::ToSchema;

use super::page_window::build_window;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
pub const DEFAULT_MAX_LIMIT: u64 = 100;
pub const DEFAULT_WINDOW_SIZE: u64 = 10;

/// Defaults and bounds applied to raw pagination input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationPolicy {
    pub default_limit: u64,
    pub max_limit: u64,
    pub window_size: u64,
}

impl Default for PaginationPolicy {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: DEFAULT_MAX_LIMIT,
            window_size: DEFAULT_WINDOW_SIZE,
        }
    }
}

/// Normalized page request. `resolve` always yields fields `>= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    /// Number of records to skip before this page.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

/// Boundary information known only once the total is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBounds {
    pub total_pages: u64,
    pub is_first: bool,
    pub is_last: bool,
}

/// Full pagination model for one response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationView {
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
    pub is_first: bool,
    pub is_last: bool,
    pub visible_page_numbers: Vec<u64>,
}

impl PaginationPolicy {
    /// Turn raw query values into a valid request.
    ///
    /// Missing, non-integer or non-positive values fall back to the
    /// defaults. A limit above `max_limit` is clamped down to it.
    pub fn resolve(&self, raw_page: Option<&str>, raw_limit: Option<&str>) -> PageRequest {
        let page = parse_positive(raw_page).unwrap_or(DEFAULT_PAGE);
        let limit = parse_positive(raw_limit)
            .unwrap_or(self.default_limit)
            .min(self.max_limit.max(1));

        PageRequest { page, limit }
    }

    /// Build the complete view for a request once `total` is known.
    pub fn view(&self, request: &PageRequest, total: u64) -> PaginationView {
        let bounds = finalize(request, total);
        PaginationView {
            page: request.page,
            limit: request.limit,
            total_pages: bounds.total_pages,
            is_first: bounds.is_first,
            is_last: bounds.is_last,
            visible_page_numbers: build_window(request.page, bounds.total_pages, self.window_size),
        }
    }
}

/// Compute page count and first/last flags.
///
/// A page past the end is not an error: it reports `is_last = true` and the
/// caller serves whatever (empty) slice the store returned.
pub fn finalize(request: &PageRequest, total: u64) -> PageBounds {
    let total_pages = total_pages(total, request.limit);
    PageBounds {
        total_pages,
        is_first: request.page <= 1,
        is_last: request.page >= total_pages,
    }
}

pub fn total_pages(total: u64, limit: u64) -> u64 {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(limit)
}

fn parse_positive(raw: Option<&str>) -> Option<u64> {
    let value: i128 = raw?.trim().parse().ok()?;
    if value < 1 {
        return None;
    }
    Some(u64::try_from(value).unwrap_or(u64::MAX))
}
