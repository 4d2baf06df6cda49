//! Newest view reconciliation
//!
//! Resolves each release of the newest strip in a fixed order: the
//! leaderboard built this cycle, then the previous cycle's newest view,
//! and only then a targeted search. That order is the only thing keeping
//! a release from being fetched twice.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::error::{LeaderboardError, Result};
use crate::extractor::build_leaderboard;
use crate::parser::leaderboard::parse_leaderboard_rows;
use crate::source::{Cookies, PageSource};
use crate::types::{LeaderboardCache, VideoInfo, VideoMap};

/// A lookup failed part way through the newest strip
///
/// `resolved` holds the releases settled before the failure; releases
/// after it were not attempted.
#[derive(Error, Debug)]
#[error("resolving {release} failed after {} entries: {source}", .resolved.len())]
pub struct PartialNewest {
    pub release: String,
    pub resolved: VideoMap,
    #[source]
    pub source: LeaderboardError,
}

impl From<PartialNewest> for LeaderboardError {
    fn from(partial: PartialNewest) -> Self {
        LeaderboardError::Fetch {
            release: partial.release,
            source: Box::new(partial.source),
        }
    }
}

/// Builds the newest view for `candidates`, in document order
///
/// # Errors
/// Returns [`PartialNewest`] on the first search or parse failure.
pub async fn reconcile_newest<S>(
    candidates: &[String],
    current: &VideoMap,
    previous: &LeaderboardCache,
    source: &S,
    cookies: &Cookies,
) -> std::result::Result<VideoMap, PartialNewest>
where
    S: PageSource + ?Sized,
{
    let mut newest = VideoMap::with_capacity(candidates.len());

    for release in candidates {
        if let Some(video) = current.get(release) {
            newest.insert(release.clone(), Arc::clone(video));
            continue;
        }
        if let Some(video) = previous.newest.get(release) {
            newest.insert(release.clone(), Arc::clone(video));
            continue;
        }
        if newest.contains_key(release) {
            continue;
        }

        match search_release(release, source, cookies).await {
            Ok(video) => {
                info!(release = %release, "Grabbed additional info from search");
                newest.insert(release.clone(), video);
            }
            Err(error) => {
                return Err(PartialNewest {
                    release: release.clone(),
                    resolved: newest,
                    source: error,
                });
            }
        }
    }

    Ok(newest)
}

/// Searches the tracker for one release and builds its record from scratch
async fn search_release<S>(release: &str, source: &S, cookies: &Cookies) -> Result<Arc<VideoInfo>>
where
    S: PageSource + ?Sized,
{
    let html = source.search_by_title(release, &cookies.tracker).await?;
    let rows: Vec<_> = parse_leaderboard_rows(&html)?
        .into_iter()
        .filter(|row| row.release == release)
        .take(1)
        .collect();

    let fresh = LeaderboardCache::empty();
    let mut found = build_leaderboard(rows, &fresh, source, &cookies.review).await?;
    found
        .remove(release)
        .ok_or_else(|| LeaderboardError::NotFound(format!("{} in search results", release)))
}
