//! Exchange-rate lookup for the earnings tracker.
//!
//! Queries the Frankfurter API (`/latest?from=EUR&to=TRY`) for a single
//! conversion rate. Lookups are best-effort: callers cache the result and
//! hide the conversion when a fetch fails.

use std::fmt;
use std::time::Duration;

use mj_core::CurrencyCode;
use mj_core::currency::is_usable_rate;
use serde::Deserialize;
use thiserror::Error;

/// Default request timeout for rate lookups.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Public Frankfurter endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.frankfurter.app";

/// Exchange-rate client errors.
#[derive(Debug, Error)]
pub enum FxError {
    /// The configured base URL was empty.
    #[error("invalid base URL: {reason}")]
    InvalidBaseUrl { reason: &'static str },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// API returned an error response.
    #[error("API error: {message}")]
    Api { message: String },
    /// Failed to parse response or the rate was missing.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Frankfurter API client.
///
/// Cloning shares the underlying HTTP connection pool.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a client for the API at `base_url` (no trailing path).
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is blank or the HTTP client fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, FxError> {
        let base_url = base_url.into();
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(FxError::InvalidBaseUrl {
                reason: "base URL cannot be empty",
            });
        }

        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(FxError::ClientBuild)?;

        Ok(Self { http, base_url })
    }

    /// Fetches how many units of `to` one unit of `from` buys.
    pub async fn latest_rate(&self, from: &CurrencyCode, to: &CurrencyCode) -> Result<f64, FxError> {
        let url = latest_url(&self.base_url, from, to);
        tracing::debug!(%url, "fetching exchange rate");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(parse_api_error(&body).unwrap_or_else(|| FxError::Api {
                message: format!("status {status}: {body}"),
            }));
        }

        parse_rate(&body, to)
    }
}

fn latest_url(base_url: &str, from: &CurrencyCode, to: &CurrencyCode) -> String {
    format!("{base_url}/latest?from={from}&to={to}")
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    rates: std::collections::HashMap<String, f64>,
}

fn parse_rate(body: &str, to: &CurrencyCode) -> Result<f64, FxError> {
    let payload: LatestResponse =
        serde_json::from_str(body).map_err(|err| FxError::InvalidResponse(err.to_string()))?;
    let rate = payload
        .rates
        .get(to.as_str())
        .copied()
        .ok_or_else(|| FxError::InvalidResponse(format!("missing rate for {to}")))?;
    if !is_usable_rate(rate) {
        return Err(FxError::InvalidResponse(format!(
            "unusable rate for {to}: {rate}"
        )));
    }
    Ok(rate)
}

fn parse_api_error(body: &str) -> Option<FxError> {
    #[derive(Deserialize)]
    struct ErrorPayload {
        message: String,
    }

    serde_json::from_str::<ErrorPayload>(body)
        .ok()
        .map(|payload| FxError::Api {
            message: payload.message,
        })
}
