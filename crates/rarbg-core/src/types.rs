//! Core data types for the leaderboard scraper
//!
//! Records are immutable once built. A cache generation shares them with
//! the next one through `Arc`, so carrying an entry forward never copies it.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Release name → shared record
pub type VideoMap = HashMap<String, Arc<VideoInfo>>;

/// Mean and population standard deviation of listed review scores
///
/// Both values are rounded to two decimals. A title without reviews
/// has both at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewStats {
    pub mean: f64,
    pub std_dev: f64,
}

/// One release from the tracker leaderboard, enriched with IMDB data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoInfo {
    /// Raw release name as listed (e.g., "Last.Looks.2021.1080p.WEBRip.DD5.1.x264-NOGRP")
    pub release: String,

    /// Normalized title stem (e.g., "Last Looks")
    pub title: String,

    /// Release year
    pub year: Option<u16>,

    /// Resolution label (e.g., "1080p")
    pub resolution: Option<String>,

    /// Genre tags in the order they were listed
    pub genres: Vec<String>,

    /// IMDB rating out of 10
    pub rating: Option<f32>,

    /// Size as listed (e.g., "2.1 GB")
    pub size: Option<String>,

    /// Poster image URL
    pub poster_url: Option<String>,

    /// Absolute URL of the torrent detail page
    pub detail_url: String,

    /// IMDB identifier (e.g., "tt13207508")
    pub imdb_id: Option<String>,

    /// IMDB title page
    pub review_url: Option<String>,

    /// Statistics over the listed user reviews
    pub review: Option<ReviewStats>,
}

impl VideoInfo {
    /// Creates an empty record for a release
    pub fn new(release: impl Into<String>) -> Self {
        Self {
            release: release.into(),
            ..Self::default()
        }
    }
}

/// Snapshot produced by one polling cycle
///
/// Handed to the next cycle as its previous cache, then dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardCache {
    pub captured_at: DateTime<Utc>,
    pub video_list: VideoMap,
    pub newest: VideoMap,
}

impl LeaderboardCache {
    /// The previous cache of the very first cycle
    pub fn empty() -> Self {
        Self::default()
    }

    /// Assembles a cache captured now
    pub fn new(video_list: VideoMap, newest: VideoMap) -> Self {
        Self {
            captured_at: Utc::now(),
            video_list,
            newest,
        }
    }

    /// Releases in this cache's newest view that the previous cache did not have
    ///
    /// Sorted by release name.
    pub fn fresh_newest(&self, previous: &LeaderboardCache) -> Vec<Arc<VideoInfo>> {
        let mut fresh: Vec<Arc<VideoInfo>> = self
            .newest
            .iter()
            .filter(|(release, _)| !previous.newest.contains_key(*release))
            .map(|(_, video)| Arc::clone(video))
            .collect();
        fresh.sort_by(|a, b| a.release.cmp(&b.release));
        fresh
    }

    /// True when both views are empty
    pub fn is_empty(&self) -> bool {
        self.video_list.is_empty() && self.newest.is_empty()
    }
}
