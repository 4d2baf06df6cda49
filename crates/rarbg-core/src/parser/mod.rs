//! HTML parsers for rarbg and IMDB
//!
//! Contains modules for parsing different page types.

pub mod leaderboard;
pub mod review;

pub use leaderboard::{RowFragment, parse_leaderboard_rows, parse_newest_titles};
pub use review::{parse_review_page, parse_review_scores};
