//! IMDB user review page parser
//!
//! Pulls the individual reviewer scores off a review listing page.

use scraper::{Html, Selector};
use tracing::warn;

use crate::error::{LeaderboardError, Result};
use crate::stats::compute_review_stats;
use crate::types::ReviewStats;

const RATING_BAR_SELECTOR: &str = "div.lister div.review-container div.ipl-ratings-bar";

/// Parses every reviewer score on an IMDB review listing page
///
/// Each rating bar holds the score in its second `span`. Bars whose score
/// cannot be read, or reads as NaN or infinity, are skipped and logged.
///
/// # Errors
/// Returns `ParseError` if a selector is invalid
pub fn parse_review_scores(html: &str) -> Result<Vec<f64>> {
    let document = Html::parse_document(html);
    let bar_selector = Selector::parse(RATING_BAR_SELECTOR)
        .map_err(|e| LeaderboardError::ParseError(format!("Invalid selector: {:?}", e)))?;
    let span_selector = Selector::parse("span")
        .map_err(|e| LeaderboardError::ParseError(format!("Invalid selector: {:?}", e)))?;

    let mut scores = Vec::new();
    for (index, bar) in document.select(&bar_selector).enumerate() {
        let text = bar
            .select(&span_selector)
            .nth(1)
            .map(|span| span.text().collect::<String>())
            .unwrap_or_default();

        match text.trim().parse::<f64>() {
            Ok(score) if score.is_finite() => scores.push(score),
            Ok(_) => warn!(index, text = text.trim(), "Skipping non-finite review score"),
            Err(e) => warn!(index, text = text.trim(), error = %e, "Skipping unreadable review score"),
        }
    }

    Ok(scores)
}

/// Parses a review listing page straight into [`ReviewStats`]
pub fn parse_review_page(html: &str) -> Result<ReviewStats> {
    let scores = parse_review_scores(html)?;
    Ok(compute_review_stats(&scores))
}
