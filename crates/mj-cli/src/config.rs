//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::Duration;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use mj_core::{CurrencyCode, DEFAULT_STALENESS_SECS};
use serde::{Deserialize, Serialize};

/// Hourly rate used until the user saves one.
pub const DEFAULT_HOURLY_RATE: f64 = 12.82;
/// Longest accepted staleness window (one year).
const MAX_STALENESS_SECS: i64 = 365 * 24 * 60 * 60;

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file.
    pub database_path: PathBuf,
    /// Currency entries are recorded in.
    pub base_currency: CurrencyCode,
    /// Currency the monthly total is converted to.
    pub target_currency: CurrencyCode,
    /// Whether to look up and show the converted total.
    pub conversion_enabled: bool,
    /// Hourly rate used when none has been saved.
    pub default_hourly_rate: f64,
    /// Base URL of the exchange-rate API.
    pub exchange_rate_url: String,
    /// Maximum age of a cached exchange rate, in seconds.
    pub rate_staleness_secs: i64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_path", &self.database_path)
            .field("base_currency", &self.base_currency.as_str())
            .field("target_currency", &self.target_currency.as_str())
            .field("conversion_enabled", &self.conversion_enabled)
            .field("default_hourly_rate", &self.default_hourly_rate)
            .field("exchange_rate_url", &self.exchange_rate_url)
            .field("rate_staleness_secs", &self.rate_staleness_secs)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: data_dir.join("minijob.db"),
            base_currency: known_code("EUR"),
            target_currency: known_code("TRY"),
            conversion_enabled: true,
            default_hourly_rate: DEFAULT_HOURLY_RATE,
            exchange_rate_url: mj_fx::DEFAULT_BASE_URL.to_string(),
            rate_staleness_secs: DEFAULT_STALENESS_SECS,
        }
    }
}

impl Config {
    /// Loads configuration from the default locations, then `config_path` if
    /// given, then `MJ_*` environment variables.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (MJ_*)
        figment = figment.merge(Env::prefixed("MJ_"));

        figment.extract()
    }

    /// How long a cached exchange rate stays usable.
    pub fn staleness_window(&self) -> Duration {
        Duration::seconds(self.rate_staleness_secs.clamp(0, MAX_STALENESS_SECS))
    }
}

fn known_code(code: &str) -> CurrencyCode {
    CurrencyCode::new(code).unwrap_or_else(|_| unreachable!("{code} is a valid currency code"))
}

/// Returns the platform-specific config directory for minijob.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("minijob"))
}

/// Returns the platform-specific data directory for minijob.
///
/// On Linux: `~/.local/share/minijob`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("minijob"))
}
