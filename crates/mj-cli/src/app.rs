//! Application state shared by every command.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use mj_core::{MonthSummary, ValidationError, YearMonth};
use mj_db::{Database, EntryStore, KeyValueStore, settings};

use crate::Config;

/// Owns the entry store, the configuration and the reference date.
///
/// Commands receive `&mut App` instead of reaching for globals, so tests can
/// run them against a [`mj_db::MemoryStore`] and a fixed `today`.
pub struct App<B = Database> {
    pub config: Config,
    pub store: EntryStore<B>,
    pub today: NaiveDate,
    rate_override: Option<f64>,
    warnings: Vec<String>,
}

impl App<Database> {
    /// Opens the configured database, falling back to an in-memory store.
    pub fn open(config: Config) -> Self {
        let today = Local::now().date_naive();
        match open_database(&config) {
            Ok(db) => Self::new(config, EntryStore::open(db), today),
            Err(err) => {
                tracing::warn!(error = %err, "database unavailable, continuing in memory");
                let mut app = Self::new(config, EntryStore::detached(), today);
                app.warn(format!("{err:#}; changes will not be saved this session"));
                app
            }
        }
    }
}

fn open_database(config: &Config) -> Result<Database> {
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }
    Database::open(&config.database_path)
        .with_context(|| format!("failed to open {}", config.database_path.display()))
}

impl<B: KeyValueStore> App<B> {
    pub fn new(config: Config, store: EntryStore<B>, today: NaiveDate) -> Self {
        Self {
            config,
            store,
            today,
            rate_override: None,
            warnings: Vec::new(),
        }
    }

    /// The month containing `today`.
    pub fn current_month(&self) -> YearMonth {
        YearMonth::of(self.today)
    }

    pub fn month_summary(&self, month: YearMonth) -> MonthSummary {
        MonthSummary::build(self.store.all(), month)
    }

    /// The default hourly rate: saved value, else the configured default.
    pub fn hourly_rate(&self) -> f64 {
        if let Some(rate) = self.rate_override {
            return rate;
        }
        let saved = self
            .store
            .backend()
            .and_then(|backend| match settings::load_hourly_rate(backend) {
                Ok(rate) => rate,
                Err(err) => {
                    tracing::warn!(error = %err, "failed to read hourly rate");
                    None
                }
            });
        saved.unwrap_or(self.config.default_hourly_rate)
    }

    /// Saves `rate` as the default hourly rate.
    ///
    /// The new rate applies for the rest of the session even if it cannot be
    /// written; a warning is queued in that case.
    pub fn set_hourly_rate(&mut self, rate: f64) -> Result<(), ValidationError> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(ValidationError::NonPositiveValue { value: rate });
        }
        self.rate_override = Some(rate);
        if let Some(backend) = self.store.backend_mut() {
            if let Err(err) = settings::save_hourly_rate(backend, rate) {
                tracing::warn!(error = %err, "failed to save hourly rate");
                self.warnings
                    .push(format!("could not save hourly rate: {err}"));
            }
        }
        tracing::debug!(rate, "hourly rate set");
        Ok(())
    }

    /// Queues a message for the user, shown once after the command.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Drains every pending warning, including the store's.
    pub fn take_warnings(&mut self) -> Vec<String> {
        let mut warnings = std::mem::take(&mut self.warnings);
        if let Some(warning) = self.store.take_warning() {
            warnings.push(warning.to_string());
        }
        warnings
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use mj_db::MemoryStore;

    pub(crate) fn test_app() -> App<MemoryStore> {
        let config = Config {
            conversion_enabled: false,
            ..Config::default()
        };
        let today = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        App::new(config, EntryStore::open(MemoryStore::new()), today)
    }

    #[test]
    fn hourly_rate_falls_back_to_config() {
        let app = test_app();
        assert!((app.hourly_rate() - 12.82).abs() < f64::EPSILON);
    }

    #[test]
    fn set_hourly_rate_persists_to_backend() {
        let mut app = test_app();
        app.set_hourly_rate(15.5).unwrap();
        assert!((app.hourly_rate() - 15.5).abs() < f64::EPSILON);

        let backend = app.store.backend().unwrap();
        assert_eq!(settings::load_hourly_rate(backend).unwrap(), Some(15.5));
    }

    #[test]
    fn set_hourly_rate_rejects_zero() {
        let mut app = test_app();
        assert!(app.set_hourly_rate(0.0).is_err());
        assert!((app.hourly_rate() - 12.82).abs() < f64::EPSILON);
    }

    #[test]
    fn detached_store_keeps_rate_for_session() {
        let config = Config::default();
        let today = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let mut app: App<MemoryStore> = App::new(config, EntryStore::detached(), today);
        app.set_hourly_rate(20.0).unwrap();
        assert!((app.hourly_rate() - 20.0).abs() < f64::EPSILON);
        assert!(app.take_warnings().is_empty());
    }

    #[test]
    fn open_falls_back_to_memory_when_path_is_unusable() {
        let temp = tempfile::tempdir().unwrap();
        let blocker = temp.path().join("file");
        std::fs::write(&blocker, "").unwrap();
        let config = Config {
            database_path: blocker.join("minijob.db"),
            ..Config::default()
        };

        let mut app = App::open(config);
        assert!(!app.store.is_persistent());
        let warnings = app.take_warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("changes will not be saved"));
    }

    #[test]
    fn current_month_follows_today() {
        let app = test_app();
        assert_eq!(app.current_month().to_string(), "2025-03");
    }
}
