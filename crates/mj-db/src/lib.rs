//! Storage layer for the earnings tracker.
//!
//! Persistence is a small key-value table in SQLite, accessed via `rusqlite`.
//! The entry collection lives under a single key as one JSON snapshot and is
//! rewritten in full on every mutation; see [`EntryStore`].
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! The application is single-threaded, so a `Database` is owned by the
//! [`EntryStore`] and never shared.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE kv (key TEXT PRIMARY KEY, value TEXT NOT NULL, updated_at TEXT NOT NULL)
//! ```
//!
//! `updated_at` is an RFC 3339 UTC timestamp. Values are opaque strings; the
//! callers in [`settings`] and [`EntryStore`] decide their encoding.

use std::collections::HashMap;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

pub mod settings;
mod store;

pub use store::{EntryStore, PersistenceWarning, StoreError};

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A stored value could not be decoded or encoded.
    #[error("invalid stored data for {key}: {source}")]
    InvalidData {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// A string key-value store that survives restarts.
///
/// Implemented by [`Database`] for real use and [`MemoryStore`] for tests and
/// throwaway sessions.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, DbError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), DbError>;
    fn remove(&mut self, key: &str) -> Result<(), DbError>;
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    /// Lists stored keys with their last update time, ordered by key.
    pub fn list_keys(&self) -> Result<Vec<(String, String)>, DbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, updated_at FROM kv ORDER BY key ASC")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        let mut keys = Vec::new();
        for row in rows {
            keys.push(row?);
        }
        Ok(keys)
    }
}

impl KeyValueStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>, DbError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), DbError> {
        let updated_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        self.conn.execute(
            "
            INSERT INTO kv (key, value, updated_at) VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            ",
            params![key, value, updated_at],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), DbError> {
        self.conn.execute("DELETE FROM kv WHERE key = ?", [key])?;
        Ok(())
    }
}

/// Non-persistent [`KeyValueStore`] backed by a `HashMap`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, DbError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), DbError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), DbError> {
        self.values.remove(key);
        Ok(())
    }
}
