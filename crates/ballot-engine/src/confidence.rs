//! Wilson score interval over up/down votes.
//!
//! See <http://www.evanmiller.org/how-not-to-sort-by-average-rating.html>.
//! Counts are Lidstone-smoothed before the interval is computed, so an item
//! with no votes still gets a finite, centred interval.

use serde::{Deserialize, Serialize};

/// z-score for an 85% confidence level.
pub const Z_85: f64 = 1.4395314800662002;

/// Pseudo-count added to each side before computing the interval.
pub const LIDSTONE_EPSILON: f64 = 0.5;

/// Which end of the interval to return.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBound {
    #[default]
    Lower,
    Upper,
}

/// Wilson confidence bound for the proportion of up votes.
pub fn confidence(up_votes: u64, down_votes: u64, bound: ConfidenceBound) -> f64 {
    let up = up_votes as f64 + LIDSTONE_EPSILON;
    let down = down_votes as f64 + LIDSTONE_EPSILON;
    let n = up + down;
    // Unreachable while LIDSTONE_EPSILON > 0.
    if n == 0.0 {
        return 0.0;
    }
    let z2 = Z_85 * Z_85;
    let p_hat = up / n;
    let center = p_hat + z2 / (2.0 * n);
    let spread = Z_85 * ((p_hat * (1.0 - p_hat) + z2 / (4.0 * n)) / n).sqrt();
    let denom = 1.0 + z2 / n;
    match bound {
        ConfidenceBound::Lower => (center - spread) / denom,
        ConfidenceBound::Upper => (center + spread) / denom,
    }
}
