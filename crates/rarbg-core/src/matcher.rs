//! Field matchers for leaderboard rows
//!
//! Pure functions that pull metadata out of short text fragments and
//! assign it onto a [`VideoInfo`]. A matcher that finds nothing leaves
//! the field untouched; none of them fail.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::VideoInfo;

/// Year token delimited like a scene release name ("Title.2021.1080p")
static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[.\s_\[(]((?:19|20)\d{2})(?:$|[.\s_\])])").expect("year regex")
});

/// Resolution / quality token from the closed set the tracker lists
static RESOLUTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|[.\s_\[(-])(480p|576p|720p|1080p|1080i|2160p|4k|uhd)(?:$|[.\s_\])-])")
        .expect("resolution regex")
});

/// IMDB genre vocabulary; longer names first so "Musical" wins over "Music"
const GENRES: &[&str] = &[
    "Film-Noir",
    "Game-Show",
    "Reality-TV",
    "Talk-Show",
    "Sci-Fi",
    "Action",
    "Adventure",
    "Animation",
    "Biography",
    "Comedy",
    "Crime",
    "Documentary",
    "Drama",
    "Family",
    "Fantasy",
    "History",
    "Horror",
    "Musical",
    "Music",
    "Mystery",
    "News",
    "Romance",
    "Short",
    "Sport",
    "Thriller",
    "War",
    "Western",
];

static GENRE_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives = GENRES
        .iter()
        .map(|g| regex::escape(g))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{})\b", alternatives)).expect("genre regex")
});

static RATING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"IMDB:\s*(\d{1,2}(?:\.\d+)?)\s*/\s*10").expect("rating regex")
});

/// Extracts title stem, year and resolution from a release name
///
/// Expects the scene layout `<title>.<YYYY>.<RESOLUTION>...`. The title stem
/// is everything before the first year or resolution token, with dots and
/// underscores turned into spaces; a name that opens with a token takes the
/// text up to the next one instead. Missing tokens leave `year` and
/// `resolution` as they were.
///
/// # Example
/// ```
/// use rarbg_core::{VideoInfo, matcher::match_basic};
/// let mut video = VideoInfo::default();
/// match_basic("Last.Looks.2021.1080p.WEBRip.DD5.1.x264-NOGRP", &mut video);
/// assert_eq!(video.title, "Last Looks");
/// assert_eq!(video.year, Some(2021));
/// assert_eq!(video.resolution.as_deref(), Some("1080p"));
/// ```
pub fn match_basic(text: &str, video: &mut VideoInfo) {
    let text = text.trim();
    let mut tokens = Vec::with_capacity(2);

    if let Some(caps) = YEAR_RE.captures(text) {
        if let Ok(year) = caps[1].parse::<u16>() {
            video.year = Some(year);
        }
        if let Some(m) = caps.get(0) {
            tokens.push(m.range());
        }
    }

    if let Some(caps) = RESOLUTION_RE.captures(text) {
        video.resolution = Some(normalize_resolution(&caps[1]));
        if let Some(m) = caps.get(0) {
            tokens.push(m.range());
        }
    }

    tokens.sort_by_key(|range| range.start);
    let Some(first) = tokens.first() else {
        video.title = normalize_title(text);
        return;
    };

    video.title = normalize_title(&text[..first.start]);
    if video.title.is_empty() {
        // Name opens with a token ("[2020].Movie.1080p"): take what follows it
        let until = tokens
            .iter()
            .map(|range| range.start)
            .find(|&start| start >= first.end)
            .unwrap_or(text.len());
        video.title = normalize_title(&text[first.end..until]);
    }
}

/// Records every known genre found in `text`, in order, without duplicates
pub fn match_genre(text: &str, video: &mut VideoInfo) {
    for m in GENRE_RE.find_iter(text) {
        let genre = m.as_str();
        if !video.genres.iter().any(|g| g == genre) {
            video.genres.push(genre.to_string());
        }
    }
}

/// Records the first "IMDB: x.y/10" rating found in `text`
pub fn match_rating(text: &str, video: &mut VideoInfo) {
    if let Some(rating) = RATING_RE
        .captures(text)
        .and_then(|caps| caps[1].parse::<f32>().ok())
    {
        video.rating = Some(rating);
    }
}

fn normalize_resolution(token: &str) -> String {
    let lower = token.to_ascii_lowercase();
    match lower.as_str() {
        "4k" | "uhd" => lower.to_ascii_uppercase(),
        _ => lower,
    }
}

fn normalize_title(stem: &str) -> String {
    stem.replace(['.', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
