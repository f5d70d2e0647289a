//! Stored keys and typed accessors for values other than entries.
//!
//! Malformed settings are treated as absent (with a warning) so a bad value
//! never blocks the app; the caller falls back to its configured default.

use chrono::{DateTime, SecondsFormat, Utc};
use mj_core::CachedRate;
use mj_core::currency::is_usable_rate;

use crate::{DbError, KeyValueStore};

/// Key of the JSON entry snapshot.
pub const ENTRIES_KEY: &str = "minijob_entries";
/// Key of the default hourly rate.
pub const HOURLY_RATE_KEY: &str = "minijob_hourly_rate";
/// Key of the cached exchange rate.
pub const EXCHANGE_RATE_KEY: &str = "minijob_exchange_rate";
/// Key of the time the cached exchange rate was fetched (RFC 3339).
pub const EXCHANGE_RATE_TIME_KEY: &str = "minijob_exchange_rate_time";

/// Loads the default hourly rate, if one was saved.
pub fn load_hourly_rate<S: KeyValueStore + ?Sized>(store: &S) -> Result<Option<f64>, DbError> {
    let Some(raw) = store.get(HOURLY_RATE_KEY)? else {
        return Ok(None);
    };
    match raw.trim().parse::<f64>() {
        Ok(rate) if rate.is_finite() && rate > 0.0 => Ok(Some(rate)),
        _ => {
            tracing::warn!(value = %raw, "ignoring invalid stored hourly rate");
            Ok(None)
        }
    }
}

/// Saves the default hourly rate.
pub fn save_hourly_rate<S: KeyValueStore + ?Sized>(store: &mut S, rate: f64) -> Result<(), DbError> {
    store.set(HOURLY_RATE_KEY, &rate.to_string())
}

/// Loads the cached exchange rate, if both the value and its fetch time are stored.
///
/// A rate that is zero, negative or not a number counts as malformed.
pub fn load_cached_rate<S: KeyValueStore + ?Sized>(
    store: &S,
) -> Result<Option<CachedRate>, DbError> {
    let (Some(rate), Some(fetched_at)) = (
        store.get(EXCHANGE_RATE_KEY)?,
        store.get(EXCHANGE_RATE_TIME_KEY)?,
    ) else {
        return Ok(None);
    };

    let rate = rate
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|rate| is_usable_rate(*rate));
    let fetched_at = DateTime::parse_from_rfc3339(fetched_at.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc));
    match (rate, fetched_at) {
        (Some(rate), Some(fetched_at)) => Ok(Some(CachedRate::new(rate, fetched_at))),
        _ => {
            tracing::warn!("ignoring malformed cached exchange rate");
            Ok(None)
        }
    }
}

/// Caches an exchange rate together with its fetch time.
pub fn save_cached_rate<S: KeyValueStore + ?Sized>(
    store: &mut S,
    cached: &CachedRate,
) -> Result<(), DbError> {
    store.set(EXCHANGE_RATE_KEY, &cached.rate.to_string())?;
    store.set(
        EXCHANGE_RATE_TIME_KEY,
        &cached
            .fetched_at
            .to_rfc3339_opts(SecondsFormat::Millis, true),
    )
}
