//! URL helper functions for rarbg and IMDB
//!
//! Provides functions for building detail, search, and IMDB URLs and
//! for pulling the IMDB id and poster out of row attributes.

use std::sync::LazyLock;

use regex::Regex;

pub const TRACKER_BASE_URL: &str = "https://rarbg.to";
pub const IMDB_BASE_URL: &str = "https://www.imdb.com";

static IMDB_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"imdb=([^&\s]+)").expect("imdb id regex"));

static POSTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(https[^'"\s\\]*?\.jpg)"#).expect("poster regex"));

/// Qualifies a relative tracker link into an absolute URL
///
/// # Example
/// ```
/// use rarbg_core::url::build_detail_url;
/// let url = build_detail_url("/torrent/abc123");
/// assert_eq!(url, "https://rarbg.to/torrent/abc123");
/// ```
pub fn build_detail_url(href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }
    format!("{}/{}", TRACKER_BASE_URL, href.trim_start_matches('/'))
}

/// Builds the tracker search path for a release name
///
/// # Example
/// ```
/// use rarbg_core::url::build_search_path;
/// let path = build_search_path("Last.Looks.2021.1080p");
/// assert_eq!(path, "/torrents.php?search=Last.Looks.2021.1080p");
/// ```
pub fn build_search_path(release: &str) -> String {
    format!("/torrents.php?search={}", urlencoding::encode(release))
}

/// Builds the IMDB title page URL
///
/// # Example
/// ```
/// use rarbg_core::url::build_imdb_url;
/// assert_eq!(build_imdb_url("tt13207508"), "https://www.imdb.com/title/tt13207508");
/// ```
pub fn build_imdb_url(imdb_id: &str) -> String {
    format!("{}/title/{}", IMDB_BASE_URL, imdb_id)
}

/// Builds the IMDB user review listing path
pub fn build_review_path(imdb_id: &str) -> String {
    format!("/title/{}/reviews", urlencoding::encode(imdb_id))
}

/// Extracts the IMDB id from a link's `imdb=` query parameter
///
/// # Example
/// ```
/// use rarbg_core::url::extract_imdb_id;
/// let id = extract_imdb_id("/torrents.php?imdb=tt13207508");
/// assert_eq!(id, Some("tt13207508".to_string()));
/// ```
pub fn extract_imdb_id(href: &str) -> Option<String> {
    IMDB_ID_RE
        .captures(href)
        .map(|caps| caps[1].to_string())
}

/// Extracts the first `https...jpg` URL embedded in a hover handler
pub fn extract_poster_url(onmouseover: &str) -> Option<String> {
    POSTER_RE
        .captures(onmouseover)
        .map(|caps| caps[1].to_string())
}
