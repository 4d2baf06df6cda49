//! Canned [`PageSource`] for unit tests

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{LeaderboardError, Result};
use crate::source::PageSource;

/// Serves pages from maps and records every request
#[derive(Default)]
pub struct StubSource {
    pub homepage: String,
    pub searches: HashMap<String, String>,
    pub reviews: HashMap<String, String>,
    pub calls: Mutex<Vec<String>>,
}

impl StubSource {
    pub fn with_review(mut self, imdb_id: &str, html: &str) -> Self {
        self.reviews.insert(imdb_id.to_string(), html.to_string());
        self
    }

    pub fn with_search(mut self, release: &str, html: &str) -> Self {
        self.searches.insert(release.to_string(), html.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with(prefix))
            .collect()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl PageSource for StubSource {
    async fn fetch_leaderboard_page(&self, _cookie: &str) -> Result<String> {
        self.record("home".to_string());
        Ok(self.homepage.clone())
    }

    async fn search_by_title(&self, release: &str, _cookie: &str) -> Result<String> {
        self.record(format!("search:{}", release));
        self.searches
            .get(release)
            .cloned()
            .ok_or_else(|| LeaderboardError::NotFound(format!("search {}", release)))
    }

    async fn fetch_review_page(&self, imdb_id: &str, _cookie: &str) -> Result<String> {
        self.record(format!("review:{}", imdb_id));
        self.reviews
            .get(imdb_id)
            .cloned()
            .ok_or_else(|| LeaderboardError::NotFound(format!("reviews {}", imdb_id)))
    }
}

/// Review listing page with one rating bar per score
pub fn review_page(scores: &[&str]) -> String {
    let bars: String = scores
        .iter()
        .map(|score| {
            format!(
                r#"<div class="review-container"><div class="ipl-ratings-bar"><span><span>{}</span><span>/10</span></span></div></div>"#,
                score
            )
        })
        .collect();
    format!(
        r#"<html><body><div class="lister">{}</div></body></html>"#,
        bars
    )
}
