//! Error types for the leaderboard scraper
//!
//! Field-level misses are not errors: a matcher that finds nothing leaves
//! the field empty. Everything here aborts the document or the cycle.

use std::fmt;

use thiserror::Error;

/// Which view of a [`LeaderboardCache`](crate::LeaderboardCache) a check refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheView {
    /// The full leaderboard table
    Leaderboard,
    /// The "newest" highlight strip
    Newest,
}

impl fmt::Display for CacheView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheView::Leaderboard => f.write_str("leaderboard"),
            CacheView::Newest => f.write_str("newest"),
        }
    }
}

/// Error type for all leaderboard scraper operations
#[derive(Error, Debug)]
pub enum LeaderboardError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Failed to parse HTML content
    #[error("Failed to parse HTML: {0}")]
    ParseError(String),

    /// Client configuration cannot be used
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A row is missing the attribute it is keyed by
    #[error("Structural parse error: {0}")]
    StructuralParse(String),

    /// Rate limited by server (HTTP 429)
    #[error("Rate limited - too many requests")]
    RateLimited,

    /// Page or release not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Tracker redirected to its captcha page, usually a stale cookie
    #[error("Blocked by tracker bot protection: {0}")]
    Blocked(String),

    /// Looking up one release of the newest view failed
    #[error("Fetching {release} failed: {source}")]
    Fetch {
        release: String,
        #[source]
        source: Box<LeaderboardError>,
    },

    /// A view ended up with no entries after a complete pass
    #[error("Parsed {0} is empty, page layout probably changed")]
    EmptyResult(CacheView),
}

/// Result type alias for leaderboard operations
pub type Result<T> = std::result::Result<T, LeaderboardError>;
