use axum::http::header::{CONTENT_RANGE, HeaderMap, HeaderValue};

use crate::models::FilterOptions;

const DEFAULT_RANGE: (u64, u64) = (0, 9);
const DEFAULT_PAGE_SIZE: u64 = 10;

/// Parse a React Admin `[start, end]` range (inclusive). Anything unparsable
/// is the default first page.
#[must_use]
pub fn parse_range(range: Option<&str>) -> (u64, u64) {
    range.map_or(DEFAULT_RANGE, |r| {
        serde_json::from_str::<[u64; 2]>(r)
            .ok()
            .filter(|[start, end]| start <= end)
            .map_or(DEFAULT_RANGE, |[start, end]| (start, end))
    })
}

/// Resolve `(offset, limit)` from `page`/`per_page` (1-based) or `range`,
/// defaulting to the first ten records.
#[must_use]
pub fn parse_pagination(params: &FilterOptions) -> (u64, u64) {
    if let (Some(page), Some(per_page)) = (params.page, params.per_page) {
        // Standard REST pagination (1-based page numbers)
        let offset = page.saturating_sub(1).saturating_mul(per_page);
        (offset, per_page)
    } else if let Some(range) = &params.range {
        // React Admin pagination
        let (start, end) = parse_range(Some(range));
        (start, end.saturating_sub(start).saturating_add(1))
    } else {
        (0, DEFAULT_PAGE_SIZE)
    }
}

/// Sanitize resource name by removing control characters for HTTP headers
fn sanitize_resource_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii() && !c.is_ascii_control())
        .collect()
}

/// Builds the `Content-Range` header, e.g. `people 0-9/42`.
///
/// The resource name is stripped of anything that cannot appear in a header
/// value.
#[must_use]
pub fn calculate_content_range(
    offset: u64,
    limit: u64,
    total_count: u64,
    resource_name: &str,
) -> HeaderMap {
    let last = offset
        .saturating_add(limit)
        .saturating_sub(1)
        .min(total_count);
    let safe_name = sanitize_resource_name(resource_name);
    let content_range = format!("{safe_name} {offset}-{last}/{total_count}");

    let value = HeaderValue::from_str(&content_range).unwrap_or_else(|_| {
        HeaderValue::from_str(&format!("items {offset}-{last}/{total_count}"))
            .unwrap_or(HeaderValue::from_static("items 0-0/0"))
    });

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_RANGE, value);
    headers
}
