//! Currency conversion values and cache freshness.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Default age in seconds after which a cached exchange rate must be refetched.
pub const DEFAULT_STALENESS_SECS: i64 = 60 * 60;

/// An exchange rate together with the time it was fetched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CachedRate {
    pub rate: f64,
    pub fetched_at: DateTime<Utc>,
}

impl CachedRate {
    pub const fn new(rate: f64, fetched_at: DateTime<Utc>) -> Self {
        Self { rate, fetched_at }
    }

    /// Whether the rate is younger than `window` at `now`.
    ///
    /// A fetch time in the future (clock moved backwards) counts as stale.
    pub fn is_fresh_at(&self, now: DateTime<Utc>, window: Duration) -> bool {
        let age = now - self.fetched_at;
        age >= Duration::zero() && age < window
    }

    /// Converts an amount in the base currency.
    pub fn convert(&self, amount: f64) -> f64 {
        convert(amount, self.rate)
    }
}

/// `amount` in the target currency at `rate`.
pub fn convert(amount: f64, rate: f64) -> f64 {
    amount * rate
}

/// Whether a fetched rate is usable for display.
pub fn is_usable_rate(rate: f64) -> bool {
    rate.is_finite() && rate > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> Duration {
        Duration::seconds(DEFAULT_STALENESS_SECS)
    }

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn rate_within_window_is_fresh() {
        let cached = CachedRate::new(35.0, at("2025-01-01T10:00:00Z"));
        assert!(cached.is_fresh_at(at("2025-01-01T10:59:59Z"), window()));
    }

    #[test]
    fn rate_at_window_boundary_is_stale() {
        let cached = CachedRate::new(35.0, at("2025-01-01T10:00:00Z"));
        assert!(!cached.is_fresh_at(at("2025-01-01T11:00:00Z"), window()));
    }

    #[test]
    fn future_fetch_time_is_stale() {
        let cached = CachedRate::new(35.0, at("2025-01-01T12:00:00Z"));
        assert!(!cached.is_fresh_at(at("2025-01-01T10:00:00Z"), window()));
    }

    #[test]
    fn convert_multiplies_by_rate() {
        let cached = CachedRate::new(2.5, at("2025-01-01T10:00:00Z"));
        assert!((cached.convert(10.0) - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn usable_rate_rejects_zero_and_nan() {
        assert!(is_usable_rate(35.2));
        assert!(!is_usable_rate(0.0));
        assert!(!is_usable_rate(f64::NAN));
    }
}
