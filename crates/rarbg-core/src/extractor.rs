//! Leaderboard extraction
//!
//! Builds one [`VideoInfo`] per leaderboard row. Releases already known
//! from the previous cycle are carried forward as-is, so they cost
//! neither parsing nor a review fetch.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::Result;
use crate::matcher::{match_basic, match_genre, match_rating};
use crate::parser::leaderboard::{RowFragment, parse_leaderboard_rows};
use crate::parser::review::parse_review_page;
use crate::source::PageSource;
use crate::types::{LeaderboardCache, VideoInfo, VideoMap};
use crate::url::{build_detail_url, build_imdb_url, extract_imdb_id, extract_poster_url};

/// Parses a leaderboard document and builds its release map
///
/// # Errors
/// - `StructuralParse` if a row has no release name
/// - Any error of the review fetch for a new release
pub async fn extract_leaderboard<S>(
    html: &str,
    previous: &LeaderboardCache,
    source: &S,
    review_cookie: &str,
) -> Result<VideoMap>
where
    S: PageSource + ?Sized,
{
    let rows = parse_leaderboard_rows(html)?;
    build_leaderboard(rows, previous, source, review_cookie).await
}

/// Builds the release map from already parsed rows, in row order
///
/// A release present in `previous.video_list` is reused by reference.
/// A release repeated within `rows` keeps its first record.
pub async fn build_leaderboard<S>(
    rows: Vec<RowFragment>,
    previous: &LeaderboardCache,
    source: &S,
    review_cookie: &str,
) -> Result<VideoMap>
where
    S: PageSource + ?Sized,
{
    let mut video_list = VideoMap::with_capacity(rows.len());

    for row in rows {
        if let Some(known) = previous.video_list.get(&row.release) {
            info!(release = %row.release, "Already in previous leaderboard");
            video_list.insert(row.release, Arc::clone(known));
            continue;
        }
        if video_list.contains_key(&row.release) {
            debug!(release = %row.release, "Duplicate row, keeping the first one");
            continue;
        }

        let video = build_video(row, source, review_cookie).await?;
        info!(release = %video.release, "Extracted new release");
        video_list.insert(video.release.clone(), Arc::new(video));
    }

    Ok(video_list)
}

async fn build_video<S>(row: RowFragment, source: &S, review_cookie: &str) -> Result<VideoInfo>
where
    S: PageSource + ?Sized,
{
    let mut video = VideoInfo::new(row.release.as_str());
    match_basic(&row.release, &mut video);
    match_genre(&row.sibling_text, &mut video);
    match_rating(&row.sibling_text, &mut video);
    video.size = row.size;
    video.detail_url = row.href.as_deref().map(build_detail_url).unwrap_or_default();
    video.poster_url = row.onmouseover.as_deref().and_then(extract_poster_url);

    if let Some(imdb_id) = row.imdb_href.as_deref().and_then(extract_imdb_id) {
        video.review_url = Some(build_imdb_url(&imdb_id));
        let html = source.fetch_review_page(&imdb_id, review_cookie).await?;
        video.review = Some(parse_review_page(&html)?);
        video.imdb_id = Some(imdb_id);
    }

    Ok(video)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LeaderboardError;
    use crate::testing::{StubSource, review_page};
    use crate::types::ReviewStats;

    fn row(release: &str, imdb: Option<&str>) -> RowFragment {
        RowFragment {
            release: release.to_string(),
            href: Some(format!("/torrent/{}", release.len())),
            onmouseover: Some(
                r"return overlib('<img src=\'https://dyncdn.me/posters2/p.jpg\' border=0>')"
                    .to_string(),
            ),
            sibling_text: "Action, Drama IMDB: 6.1/10".to_string(),
            imdb_href: imdb.map(|id| format!("/torrents.php?imdb={}", id)),
            size: Some("1.4 GB".to_string()),
        }
    }

    #[tokio::test]
    async fn test_build_leaderboard_fills_all_fields() {
        let source = StubSource::default().with_review("tt13207508", &review_page(&["6", "8"]));
        let rows = vec![row(
            "Last.Looks.2021.1080p.WEBRip.DD5.1.x264-NOGRP",
            Some("tt13207508"),
        )];

        let map = build_leaderboard(rows, &LeaderboardCache::empty(), &source, "imdb-cookie")
            .await
            .unwrap();

        let video = &map["Last.Looks.2021.1080p.WEBRip.DD5.1.x264-NOGRP"];
        assert_eq!(video.title, "Last Looks");
        assert_eq!(video.year, Some(2021));
        assert_eq!(video.resolution.as_deref(), Some("1080p"));
        assert_eq!(video.genres, vec!["Action", "Drama"]);
        assert_eq!(video.rating, Some(6.1));
        assert_eq!(video.size.as_deref(), Some("1.4 GB"));
        assert_eq!(video.detail_url, "https://rarbg.to/torrent/45");
        assert_eq!(video.poster_url.as_deref(), Some("https://dyncdn.me/posters2/p.jpg"));
        assert_eq!(video.imdb_id.as_deref(), Some("tt13207508"));
        assert_eq!(
            video.review_url.as_deref(),
            Some("https://www.imdb.com/title/tt13207508")
        );
        assert_eq!(video.review, Some(ReviewStats { mean: 7.0, std_dev: 1.0 }));
        assert_eq!(source.calls(), vec!["review:tt13207508"]);
    }

    #[tokio::test]
    async fn test_build_leaderboard_without_imdb_link_skips_review() {
        let source = StubSource::default();
        let rows = vec![row("Some.Show.S01E01.720p.WEB", None)];

        let map = build_leaderboard(rows, &LeaderboardCache::empty(), &source, "")
            .await
            .unwrap();

        let video = &map["Some.Show.S01E01.720p.WEB"];
        assert_eq!(video.imdb_id, None);
        assert_eq!(video.review_url, None);
        assert_eq!(video.review, None);
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_poster_attribute_leaves_poster_empty() {
        let source = StubSource::default();
        let mut bad = row("Movie.2020.720p", None);
        bad.onmouseover = Some("return overlib('nothing here')".to_string());

        let map = build_leaderboard(vec![bad], &LeaderboardCache::empty(), &source, "")
            .await
            .unwrap();

        assert_eq!(map["Movie.2020.720p"].poster_url, None);
    }

    #[tokio::test]
    async fn test_previous_release_is_reused_without_fetch() {
        let source = StubSource::default().with_review("tt2", &review_page(&["5"]));
        let mut known = VideoInfo::new("Known.Movie.2020.1080p");
        known.title = "From previous cycle".to_string();
        let known = Arc::new(known);

        let mut previous = LeaderboardCache::empty();
        previous
            .video_list
            .insert(known.release.clone(), Arc::clone(&known));

        let rows = vec![
            row("Known.Movie.2020.1080p", Some("tt1")),
            row("New.Movie.2021.720p", Some("tt2")),
        ];
        let map = build_leaderboard(rows, &previous, &source, "").await.unwrap();

        assert!(Arc::ptr_eq(&map["Known.Movie.2020.1080p"], &known));
        assert_eq!(map["Known.Movie.2020.1080p"].title, "From previous cycle");
        assert_eq!(source.calls(), vec!["review:tt2"]);
    }

    #[tokio::test]
    async fn test_duplicate_rows_fetch_once() {
        let source = StubSource::default().with_review("tt1", &review_page(&["5"]));
        let rows = vec![row("Dup.2020.720p", Some("tt1")), row("Dup.2020.720p", Some("tt1"))];

        let map = build_leaderboard(rows, &LeaderboardCache::empty(), &source, "")
            .await
            .unwrap();

        assert_eq!(map.len(), 1);
        assert_eq!(source.calls(), vec!["review:tt1"]);
    }

    #[tokio::test]
    async fn test_review_fetch_failure_propagates() {
        let source = StubSource::default();
        let rows = vec![row("Movie.2020.720p", Some("tt404"))];

        let result = build_leaderboard(rows, &LeaderboardCache::empty(), &source, "").await;

        assert!(matches!(result, Err(LeaderboardError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_extract_leaderboard_empty_document() {
        let source = StubSource::default();
        let map = extract_leaderboard("<html></html>", &LeaderboardCache::empty(), &source, "")
            .await
            .unwrap();
        assert!(map.is_empty());
    }
}
