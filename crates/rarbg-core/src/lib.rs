//! rarbg Leaderboard Scraper Core Library
//!
//! Scrapes the rarbg homepage leaderboard and its "newest" strip, enriches
//! every release with IMDB review statistics, and carries results across
//! polling cycles so known releases are never fetched twice.
//!
//! # Overview
//!
//! - Field matchers for scene release names, genres and ratings
//! - Review aggregation (mean / population standard deviation)
//! - Leaderboard extraction that reuses the previous cycle's records
//! - Newest view reconciliation: current leaderboard, then previous cache,
//!   then a targeted search
//! - Rate-limited HTTP client behind the [`PageSource`] trait
//!
//! # Example
//!
//! ```no_run
//! use rarbg_core::{Cookies, LeaderboardCache, LeaderboardScraper, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let scraper = LeaderboardScraper::new(Cookies::new("rarbg-cookie", "imdb-cookie"))?;
//!
//!     let first = scraper.run_cycle(&LeaderboardCache::empty()).await?;
//!     let second = scraper.run_cycle(&first).await?;
//!
//!     for video in second.fresh_newest(&first) {
//!         println!("{} ({:?}): {:?}", video.title, video.year, video.review);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
pub mod extractor;
pub mod matcher;
pub mod parser;
mod pipeline;
pub mod reconcile;
mod source;
pub mod stats;
mod types;
pub mod url;

#[cfg(test)]
mod testing;

// Re-export client types
pub use client::{ClientConfig, RarbgClient, RateLimiter};

// Re-export error types
pub use error::{CacheView, LeaderboardError, Result};

// Re-export pipeline steps
pub use extractor::{build_leaderboard, extract_leaderboard};
pub use parser::{RowFragment, parse_leaderboard_rows, parse_newest_titles, parse_review_page};
pub use reconcile::{PartialNewest, reconcile_newest};
pub use stats::compute_review_stats;

// Re-export main scraper API
pub use pipeline::{LeaderboardScraper, ScraperConfig};

// Re-export the page source seam
pub use source::{Cookies, PageSource};

// Re-export data types
pub use types::{LeaderboardCache, ReviewStats, VideoInfo, VideoMap};
