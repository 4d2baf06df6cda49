//! Review score aggregation

use crate::types::ReviewStats;

/// Computes mean and population standard deviation of review scores
///
/// Both values are rounded to two decimals, halves away from zero.
/// An empty slice means "no reviews yet" and yields zeros.
///
/// # Example
/// ```
/// use rarbg_core::stats::compute_review_stats;
/// let stats = compute_review_stats(&[6.0, 8.0]);
/// assert_eq!(stats.mean, 7.0);
/// assert_eq!(stats.std_dev, 1.0);
/// ```
pub fn compute_review_stats(scores: &[f64]) -> ReviewStats {
    if scores.is_empty() {
        return ReviewStats::default();
    }

    let count = scores.len() as f64;
    let mean = scores.iter().sum::<f64>() / count;
    let variance = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / count;

    ReviewStats {
        mean: round2(mean),
        std_dev: round2(variance.sqrt()),
    }
}

/// `f64::round` already rounds halves away from zero
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
