use chrono::{DateTime, Utc};

// Weights
pub const STAR_WEIGHT: f64 = 1.0;
pub const FORK_WEIGHT: f64 = 1.5;
pub const UPDATE_PENALTY_PER_DAY: f64 = 0.05;

// Caps. Stars and forks beyond these still count; they only size the
// normalization denominator.
pub const STAR_COUNT_CAP: u32 = 10_000;
pub const FORK_COUNT_CAP: u32 = 1_000;
/// A two-year-old push gets the same penalty as a one-year-old one
pub const UPDATE_PENALTY_DAYS_CAP: i64 = 365;

// Score bounds
pub const MAX_RAW_SCORE: f64 =
    STAR_COUNT_CAP as f64 * STAR_WEIGHT + FORK_COUNT_CAP as f64 * FORK_WEIGHT;
pub const MIN_NORMALIZED_SCORE: f64 = 0.0;
pub const MAX_NORMALIZED_SCORE: f64 = 5.0;

/// Two decimal places
pub const ROUNDING_SCALE: f64 = 100.0;

/// Turns stars, forks and update recency into a popularity score
pub trait PopularityScorer: Send + Sync {
    /// Score in `[0.0, 5.0]`, higher is more popular
    fn score(&self, stars: u32, forks: u32, days_since_update: i64) -> f64;
}

/// Weighted stars and forks minus a per-day staleness penalty, normalized to
/// `[0, 5]` and rounded to two decimals.
///
/// `days_since_update` is only capped from above. A negative value (push
/// timestamp in the future, clock skew) lowers the penalty below zero and so
/// raises the score.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimplePopularityScorer;

impl PopularityScorer for SimplePopularityScorer {
    fn score(&self, stars: u32, forks: u32, days_since_update: i64) -> f64 {
        let capped_days = days_since_update.min(UPDATE_PENALTY_DAYS_CAP);

        let raw = STAR_WEIGHT * f64::from(stars) + FORK_WEIGHT * f64::from(forks)
            - capped_days as f64 * UPDATE_PENALTY_PER_DAY;
        let raw = raw.max(MIN_NORMALIZED_SCORE);

        let normalized = (raw / MAX_RAW_SCORE) * MAX_NORMALIZED_SCORE;
        let normalized = normalized.min(MAX_NORMALIZED_SCORE);

        round_half_up(normalized)
    }
}

fn round_half_up(value: f64) -> f64 {
    (value * ROUNDING_SCALE + 0.5).floor() / ROUNDING_SCALE
}

/// Whole days from `pushed_at` to `now`, rounded down.
///
/// Zero for anything pushed within the last 24 hours; negative when
/// `pushed_at` lies in the future.
pub fn days_since(pushed_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - pushed_at).num_seconds().div_euclid(86_400)
}
