//! Main scraper API
//!
//! Runs one polling cycle: fetch the homepage, extract the leaderboard,
//! reconcile the newest view against the previous cache.

use tracing::info;

use crate::client::{ClientConfig, RarbgClient};
use crate::error::{CacheView, LeaderboardError, Result};
use crate::extractor::build_leaderboard;
use crate::parser::{parse_leaderboard_rows, parse_newest_titles};
use crate::reconcile::reconcile_newest;
use crate::source::{Cookies, PageSource};
use crate::types::LeaderboardCache;

/// Everything needed to build a [`LeaderboardScraper`] over HTTP
#[derive(Debug, Clone, Default)]
pub struct ScraperConfig {
    pub client: ClientConfig,
    pub cookies: Cookies,
}

/// Main scraper API
///
/// Combines a [`PageSource`] with the extraction and reconciliation steps.
/// Cycles run strictly one fetch at a time.
pub struct LeaderboardScraper<S = RarbgClient> {
    source: S,
    cookies: Cookies,
}

impl LeaderboardScraper<RarbgClient> {
    /// Create a new scraper over HTTP with default client configuration
    ///
    /// # Errors
    /// Returns error if HTTP client initialization fails
    pub fn new(cookies: Cookies) -> Result<Self> {
        Self::with_config(ScraperConfig {
            client: ClientConfig::default(),
            cookies,
        })
    }

    /// Create a new scraper over HTTP with custom configuration
    ///
    /// # Errors
    /// Returns error if HTTP client initialization fails
    pub fn with_config(config: ScraperConfig) -> Result<Self> {
        let source = RarbgClient::with_config(config.client)?;
        Ok(Self {
            source,
            cookies: config.cookies,
        })
    }
}

impl<S: PageSource> LeaderboardScraper<S> {
    /// Create a scraper over any page source
    pub fn with_source(source: S, cookies: Cookies) -> Self {
        Self { source, cookies }
    }

    /// Get a reference to the page source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run one full cycle against `previous`
    ///
    /// # Returns
    /// The new cache, to be passed as `previous` next cycle
    ///
    /// # Errors
    /// - `HttpError`, `RateLimited`, `Blocked` if the homepage fetch fails
    /// - everything [`parse_home_page`](Self::parse_home_page) returns
    ///
    /// # Example
    /// ```no_run
    /// # async fn example() -> rarbg_core::Result<()> {
    /// use rarbg_core::{Cookies, LeaderboardCache, LeaderboardScraper};
    /// let scraper = LeaderboardScraper::new(Cookies::new("tracker", "imdb"))?;
    /// let mut cache = LeaderboardCache::empty();
    /// for _ in 0..2 {
    ///     cache = scraper.run_cycle(&cache).await?;
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run_cycle(&self, previous: &LeaderboardCache) -> Result<LeaderboardCache> {
        let html = self
            .source
            .fetch_leaderboard_page(&self.cookies.tracker)
            .await?;
        self.parse_home_page(&html, previous).await
    }

    /// Build a cache from an already fetched homepage
    ///
    /// # Errors
    /// - `StructuralParse` if a leaderboard row or newest entry has no name
    /// - `Fetch` if a newest release could not be looked up
    /// - `EmptyResult` if either view ends up empty
    pub async fn parse_home_page(
        &self,
        html: &str,
        previous: &LeaderboardCache,
    ) -> Result<LeaderboardCache> {
        let rows = parse_leaderboard_rows(html)?;
        let candidates = parse_newest_titles(html)?;

        let video_list = build_leaderboard(rows, previous, &self.source, &self.cookies.review).await?;
        if video_list.is_empty() {
            return Err(LeaderboardError::EmptyResult(CacheView::Leaderboard));
        }

        let newest = reconcile_newest(
            &candidates,
            &video_list,
            previous,
            &self.source,
            &self.cookies,
        )
        .await?;
        if newest.is_empty() {
            return Err(LeaderboardError::EmptyResult(CacheView::Newest));
        }

        info!(
            leaderboard = video_list.len(),
            newest = newest.len(),
            "Parsed homepage"
        );
        Ok(LeaderboardCache::new(video_list, newest))
    }
}
