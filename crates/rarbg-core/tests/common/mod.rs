//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use rarbg_core::{LeaderboardError, PageSource, Result};

/// Serves canned pages and records every request with its cookie
#[derive(Default)]
pub struct MockSource {
    pub homepage: Mutex<String>,
    pub searches: HashMap<String, String>,
    pub reviews: HashMap<String, String>,
    pub calls: Mutex<Vec<(String, String)>>,
}

impl MockSource {
    pub fn new(homepage: String) -> Self {
        Self {
            homepage: Mutex::new(homepage),
            ..Self::default()
        }
    }

    pub fn set_homepage(&self, html: String) {
        *self.homepage.lock().unwrap() = html;
    }

    pub fn review(mut self, imdb_id: &str, scores: &[&str]) -> Self {
        self.reviews.insert(imdb_id.to_string(), review_page(scores));
        self
    }

    pub fn search(mut self, release: &str, html: String) -> Self {
        self.searches.insert(release.to_string(), html);
        self
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(call, _)| call.starts_with(prefix))
            .count()
    }

    pub fn cookies_for(&self, prefix: &str) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(call, _)| call.starts_with(prefix))
            .map(|(_, cookie)| cookie.clone())
            .collect()
    }

    pub fn reset(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: String, cookie: &str) {
        self.calls.lock().unwrap().push((call, cookie.to_string()));
    }
}

#[async_trait]
impl PageSource for MockSource {
    async fn fetch_leaderboard_page(&self, cookie: &str) -> Result<String> {
        self.record("home".to_string(), cookie);
        Ok(self.homepage.lock().unwrap().clone())
    }

    async fn search_by_title(&self, release: &str, cookie: &str) -> Result<String> {
        self.record(format!("search:{}", release), cookie);
        self.searches
            .get(release)
            .cloned()
            .ok_or_else(|| LeaderboardError::NotFound(release.to_string()))
    }

    async fn fetch_review_page(&self, imdb_id: &str, cookie: &str) -> Result<String> {
        self.record(format!("review:{}", imdb_id), cookie);
        self.reviews
            .get(imdb_id)
            .cloned()
            .ok_or_else(|| LeaderboardError::NotFound(imdb_id.to_string()))
    }
}

/// One leaderboard row: (release, imdb id, genre/rating text, size)
pub struct Row<'a> {
    pub release: &'a str,
    pub imdb: Option<&'a str>,
    pub info: &'a str,
    pub size: &'a str,
}

pub fn row_html(row: &Row) -> String {
    let imdb = row
        .imdb
        .map(|id| format!(r#" <a href="/torrents.php?imdb={}"><img src="imdb.png"></a>"#, id))
        .unwrap_or_default();
    format!(
        r#"<tr class="lista2">
            <td><a href="/torrents.php?category=44"><img src="cat.png"></a></td>
            <td><a onmouseover="return overlib('&lt;img src=\'https://dyncdn.me/posters2/{release}.jpg\' border=0&gt;')" href="/torrent/{release}" title="{release}">{release}</a>{imdb}<br><span>{info}</span></td>
            <td width="150px">2022-02-19 10:11:12</td>
            <td width="100px">{size}</td>
        </tr>"#,
        release = row.release,
        imdb = imdb,
        info = row.info,
        size = row.size,
    )
}

/// A homepage (or search page) with the given newest strip and rows
pub fn homepage(newest: &[&str], rows: &[Row]) -> String {
    let newest: String = newest
        .iter()
        .map(|release| {
            format!(
                r#"<td><a href="/torrent/{0}" title=" {0} "><img src="https://dyncdn.me/static/{0}.jpg"></a></td>"#,
                release
            )
        })
        .collect();
    let rows: String = rows.iter().map(row_html).collect();
    format!(
        r#"<html><head><title>RARBG</title></head><body>
        <div>logo</div><div>menu</div><div>search</div><div>notice</div><div>ad</div>
        <table><tr>
            <td>sidebar</td>
            <td>
                <table class="newest">
                    <tr><td>Newest</td></tr>
                    <tr><td><div><table><tr>{newest}</tr></table></div></td></tr>
                </table>
                <table class="lista2t">
                    <tr class="lista1"><td>Cat.</td><td>File</td><td>Added</td><td>Size</td></tr>
                    {rows}
                </table>
            </td>
        </tr></table>
        </body></html>"#,
        newest = newest,
        rows = rows,
    )
}

pub fn review_page(scores: &[&str]) -> String {
    let bars: String = scores
        .iter()
        .map(|score| {
            format!(
                r#"<div class="review-container"><div class="ipl-ratings-bar"><span class="rating-other-user-rating"><span>{}</span><span class="point-scale">/10</span></span></div></div>"#,
                score
            )
        })
        .collect();
    format!(
        r#"<html><body><div class="lister"><div class="lister-list">{}</div></div></body></html>"#,
        bars
    )
}
