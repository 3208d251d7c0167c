use crate::config::PaginationSettings;

/// Resolved pagination window for a listing query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Resolve raw page/limit parameters against the configured policy.
///
/// `page < 1` clamps to 1. A limit outside `[1, max_page_size]` resets to
/// the configured default rather than clamping to the nearest bound.
pub fn resolve(
    page: Option<i64>,
    limit: Option<i64>,
    settings: &PaginationSettings,
) -> PageWindow {
    let page = page.unwrap_or(1).max(1);

    let mut limit = limit.unwrap_or(settings.default_page_size);
    if limit < 1 || limit > settings.max_page_size {
        limit = settings.default_page_size;
    }

    PageWindow {
        page,
        limit,
        offset: (page - 1) * limit,
    }
}

/// Ceiling division of total rows by page size; zero rows yield zero pages.
pub fn total_pages(total: i64, limit: i64) -> i64 {
    (total + limit - 1) / limit
}
