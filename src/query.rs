//! Search URL construction.

use crate::models::SearchTarget;

/// Build the date-sorted search URL for `target` under `base_url`.
///
/// ```ignore
/// let url = build_search_url("https://www.aljazeera.com/", &SearchTarget::Breaking);
/// assert_eq!(url, "https://www.aljazeera.com/search/breaking?sort=date");
/// ```
pub fn build_search_url(base_url: &str, target: &SearchTarget) -> String {
    let base = base_url.trim_end_matches('/');
    format!(
        "{}/search/{}?sort=date",
        base,
        urlencoding::encode(target.query())
    )
}
