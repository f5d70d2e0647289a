//! Exchange-rate resolution with a cache in the key-value store.
//!
//! A cached rate younger than the configured staleness window is used as is.
//! Otherwise one fetch is attempted; a failure hides the conversion instead
//! of failing the command.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use mj_core::{CachedRate, CurrencyCode};
use mj_db::{KeyValueStore, settings};

use crate::app::App;

/// Source of fresh exchange rates.
pub trait RateFetcher {
    fn fetch(&self, from: &CurrencyCode, to: &CurrencyCode) -> Result<f64>;
}

/// Fetches rates over HTTP on a current-thread runtime created per call.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    base_url: String,
}

impl HttpFetcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl RateFetcher for HttpFetcher {
    fn fetch(&self, from: &CurrencyCode, to: &CurrencyCode) -> Result<f64> {
        let client = mj_fx::Client::new(self.base_url.as_str())
            .context("failed to create exchange-rate client")?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("failed to start async runtime")?;
        let rate = runtime.block_on(client.latest_rate(from, to))?;
        Ok(rate)
    }
}

/// How a resolved rate was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateSource {
    Cache,
    Network,
}

/// A rate ready to convert the month total.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRate {
    pub rate: CachedRate,
    pub source: RateSource,
}

/// Resolves the base→target rate, or `None` when conversion is off or unavailable.
///
/// `refresh` skips the cache and always fetches.
pub fn resolve_rate<B: KeyValueStore>(
    app: &mut App<B>,
    fetcher: &dyn RateFetcher,
    now: DateTime<Utc>,
    refresh: bool,
) -> Option<ResolvedRate> {
    if !app.config.conversion_enabled {
        tracing::debug!("currency conversion disabled");
        return None;
    }

    if !refresh {
        let cached = app
            .store
            .backend()
            .and_then(|backend| match settings::load_cached_rate(backend) {
                Ok(cached) => cached,
                Err(err) => {
                    tracing::warn!(error = %err, "failed to read cached exchange rate");
                    None
                }
            });
        if let Some(cached) = cached {
            if cached.is_fresh_at(now, app.config.staleness_window()) {
                tracing::debug!(rate = cached.rate, "using cached exchange rate");
                return Some(ResolvedRate {
                    rate: cached,
                    source: RateSource::Cache,
                });
            }
            tracing::debug!(fetched_at = %cached.fetched_at, "cached exchange rate is stale");
        }
    }

    let (from, to) = (&app.config.base_currency, &app.config.target_currency);
    let rate = match fetcher.fetch(from, to) {
        Ok(rate) => CachedRate::new(rate, now),
        Err(err) => {
            tracing::warn!(error = %format!("{err:#}"), %from, %to, "exchange rate unavailable");
            return None;
        }
    };

    if let Some(backend) = app.store.backend_mut() {
        if let Err(err) = settings::save_cached_rate(backend, &rate) {
            tracing::warn!(error = %err, "failed to cache exchange rate");
        }
    }
    tracing::debug!(rate = rate.rate, "fetched exchange rate");

    Some(ResolvedRate {
        rate,
        source: RateSource::Network,
    })
}
