//! Page source abstraction
//!
//! The pipeline never talks HTTP directly; it asks a [`PageSource`] for
//! raw HTML. [`RarbgClient`](crate::RarbgClient) is the real one, tests
//! plug in canned pages.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Fetches the three kinds of pages the pipeline reads
///
/// Cookies are passed through verbatim and never inspected.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Tracker homepage with the leaderboard and the newest strip
    async fn fetch_leaderboard_page(&self, cookie: &str) -> Result<String>;

    /// Tracker search results for one release name
    async fn search_by_title(&self, release: &str, cookie: &str) -> Result<String>;

    /// IMDB user review listing for one title
    async fn fetch_review_page(&self, imdb_id: &str, cookie: &str) -> Result<String>;
}

/// Opaque session cookies for the two sites
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookies {
    /// Sent to the tracker (homepage and search)
    pub tracker: String,
    /// Sent to the review site
    pub review: String,
}

impl Cookies {
    pub fn new(tracker: impl Into<String>, review: impl Into<String>) -> Self {
        Self {
            tracker: tracker.into(),
            review: review.into(),
        }
    }
}
