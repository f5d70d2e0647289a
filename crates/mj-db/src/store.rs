//! The entry store: an in-memory collection mirrored to a key-value backend.
//!
//! Every mutation rewrites the whole JSON snapshot under
//! [`ENTRIES_KEY`](crate::settings::ENTRIES_KEY). If the backend cannot be
//! read or written, the store drops it and keeps working in memory for the
//! rest of the session, leaving a [`PersistenceWarning`] for the caller.

use std::cmp::Reverse;
use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use mj_core::{Entry, EntryFields, EntryId, EntryUpdate};
use serde_json::Value;
use thiserror::Error;

use crate::settings::ENTRIES_KEY;
use crate::{DbError, KeyValueStore};

/// Entry store errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No entry has the given id.
    #[error("entry not found: {0}")]
    NotFound(EntryId),
}

/// Non-fatal notice that the store fell back to in-memory operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistenceWarning {
    message: String,
}

impl PersistenceWarning {
    fn new(context: &str, err: &DbError) -> Self {
        Self {
            message: format!("{context}: {err}; changes will not be saved this session"),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for PersistenceWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Work entries, kept sorted by date (newest first).
///
/// Entries with equal dates keep no particular relative order beyond the most
/// recently added appearing first. Entries whose date does not parse sort last.
pub struct EntryStore<B> {
    entries: Vec<Entry>,
    backend: Option<B>,
    warning: Option<PersistenceWarning>,
}

impl<B: KeyValueStore> EntryStore<B> {
    /// Loads the stored snapshot from `backend`.
    ///
    /// A backend that cannot be read, or holds a snapshot that is not a JSON
    /// array, is dropped so the snapshot is never overwritten; the store then
    /// starts empty and in memory only.
    pub fn open(backend: B) -> Self {
        match load_entries(&backend) {
            Ok(entries) => {
                tracing::debug!(count = entries.len(), "loaded entries");
                let mut store = Self {
                    entries,
                    backend: Some(backend),
                    warning: None,
                };
                store.sort();
                store
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to load entries, continuing in memory");
                Self {
                    entries: Vec::new(),
                    backend: None,
                    warning: Some(PersistenceWarning::new("could not load saved entries", &err)),
                }
            }
        }
    }

    /// A store with no backend; nothing it holds outlives the process.
    pub const fn detached() -> Self {
        Self {
            entries: Vec::new(),
            backend: None,
            warning: None,
        }
    }

    /// Whether mutations are still being persisted.
    pub const fn is_persistent(&self) -> bool {
        self.backend.is_some()
    }

    pub const fn backend(&self) -> Option<&B> {
        self.backend.as_ref()
    }

    pub fn backend_mut(&mut self) -> Option<&mut B> {
        self.backend.as_mut()
    }

    /// Takes the pending persistence warning, if any, so it is reported once.
    pub fn take_warning(&mut self) -> Option<PersistenceWarning> {
        self.warning.take()
    }

    /// All entries, newest date first.
    pub fn all(&self) -> &[Entry] {
        &self.entries
    }

    pub fn get(&self, id: EntryId) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Adds an entry with a fresh id derived from the current time.
    pub fn add(&mut self, fields: EntryFields) -> Entry {
        self.add_at(fields, Utc::now())
    }

    /// Adds an entry with a fresh id derived from `now`.
    ///
    /// The id is `now` in milliseconds, bumped past the largest existing id
    /// when needed, so it is unique even for adds within the same millisecond.
    pub fn add_at(&mut self, fields: EntryFields, now: DateTime<Utc>) -> Entry {
        let entry = Entry::new(self.fresh_id(now), fields);
        self.entries.insert(0, entry.clone());
        self.sort();
        self.persist();
        tracing::debug!(id = %entry.id, date = %entry.date, "entry added");
        entry
    }

    /// Merges `update` into the entry with `id`.
    ///
    /// Leaves the collection untouched when no entry has that id.
    pub fn update(&mut self, id: EntryId, update: &EntryUpdate) -> Result<Entry, StoreError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or(StoreError::NotFound(id))?;
        entry.apply(update);
        let updated = entry.clone();
        self.sort();
        self.persist();
        tracing::debug!(%id, "entry updated");
        Ok(updated)
    }

    /// Deletes the entry with `id`; returns whether one was removed.
    pub fn remove(&mut self, id: EntryId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        let removed = self.entries.len() != before;
        if removed {
            self.persist();
            tracing::debug!(%id, "entry removed");
        }
        removed
    }

    /// Deletes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.persist();
        tracing::debug!("entries cleared");
    }

    fn fresh_id(&self, now: DateTime<Utc>) -> EntryId {
        let candidate = now.timestamp_millis();
        let Some(max) = self.entries.iter().map(|entry| entry.id.get()).max() else {
            return EntryId::new(candidate);
        };
        if let Some(next) = max.checked_add(1) {
            return EntryId::new(candidate.max(next));
        }

        // A stored id already holds i64::MAX; reuse the lowest free one.
        let taken: HashSet<i64> = self.entries.iter().map(|entry| entry.id.get()).collect();
        let id = (1..=i64::MAX).find(|id| !taken.contains(id)).unwrap_or(1);
        tracing::warn!(id, "largest entry id is exhausted, reusing a free id");
        EntryId::new(id)
    }

    fn sort(&mut self) {
        self.entries
            .sort_by_cached_key(|entry| Reverse(entry.parsed_date()));
    }

    fn persist(&mut self) {
        let Some(backend) = self.backend.as_mut() else {
            return;
        };
        let result = serde_json::to_string(&self.entries)
            .map_err(|source| DbError::InvalidData {
                key: ENTRIES_KEY,
                source,
            })
            .and_then(|snapshot| backend.set(ENTRIES_KEY, &snapshot));

        if let Err(err) = result {
            tracing::warn!(error = %err, "failed to save entries, continuing in memory");
            self.backend = None;
            self.warning = Some(PersistenceWarning::new("could not save entries", &err));
        }
    }
}

fn load_entries<B: KeyValueStore>(backend: &B) -> Result<Vec<Entry>, DbError> {
    let Some(raw) = backend.get(ENTRIES_KEY)? else {
        return Ok(Vec::new());
    };
    let records: Vec<Value> = serde_json::from_str(&raw).map_err(|source| DbError::InvalidData {
        key: ENTRIES_KEY,
        source,
    })?;

    let mut entries = Vec::with_capacity(records.len());
    for record in records {
        match serde_json::from_value::<Entry>(record) {
            Ok(entry) if entry.value.is_finite() && entry.value > 0.0 => entries.push(entry),
            Ok(entry) => {
                tracing::warn!(
                    id = %entry.id,
                    value = entry.value,
                    "skipping entry record with invalid value"
                );
            }
            Err(err) => tracing::warn!(error = %err, "skipping unreadable entry record"),
        }
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDate;
    use mj_core::{EntryDraft, EntryPatch, Pay};

    use crate::{Database, MemoryStore};

    fn fields(date: &str, amount: f64) -> EntryFields {
        EntryDraft {
            date: Some(date.to_string()),
            pay: Pay::Daily { amount },
            note: None,
        }
        .validate()
        .unwrap()
    }

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn dates(store: &EntryStore<impl KeyValueStore>) -> Vec<String> {
        store.all().iter().map(|entry| entry.date.clone()).collect()
    }

    #[test]
    fn add_then_all_contains_entry_with_fresh_id() {
        let mut store = EntryStore::open(MemoryStore::new());
        let now = at("2025-03-14T12:00:00Z");
        let added = store.add_at(fields("2025-03-14", 50.0), now);

        assert_eq!(added.id.get(), now.timestamp_millis());
        assert_eq!(store.all().len(), 1);
        assert_eq!(store.all()[0].fields(), Some(fields("2025-03-14", 50.0)));
    }

    #[test]
    fn ids_are_unique_within_the_same_millisecond() {
        let mut store = EntryStore::open(MemoryStore::new());
        let now = at("2025-03-14T12:00:00Z");
        let first = store.add_at(fields("2025-03-14", 1.0), now);
        let second = store.add_at(fields("2025-03-14", 2.0), now);
        assert_ne!(first.id, second.id);
        assert_eq!(second.id.get(), first.id.get() + 1);
    }

    #[test]
    fn all_is_sorted_newest_first() {
        let mut store = EntryStore::open(MemoryStore::new());
        store.add(fields("2025-03-01", 1.0));
        store.add(fields("2025-03-20", 2.0));
        store.add(fields("2025-02-11", 3.0));
        assert_eq!(dates(&store), vec!["2025-03-20", "2025-03-01", "2025-02-11"]);
    }

    #[test]
    fn remove_deletes_entry() {
        let mut store = EntryStore::open(MemoryStore::new());
        let entry = store.add(fields("2025-03-01", 1.0));
        assert!(store.remove(entry.id));
        assert!(store.get(entry.id).is_none());
        assert!(!store.remove(entry.id));
    }

    #[test]
    fn update_missing_id_is_not_found_and_changes_nothing() {
        let mut store = EntryStore::open(MemoryStore::new());
        store.add(fields("2025-03-01", 1.0));
        let before = store.all().to_vec();

        let update = EntryPatch {
            note: Some("x".to_string()),
            ..EntryPatch::default()
        }
        .validate()
        .unwrap();
        let missing = EntryId::new(42);
        assert_eq!(store.update(missing, &update), Err(StoreError::NotFound(missing)));
        assert_eq!(store.all(), before.as_slice());
    }

    #[test]
    fn update_merges_and_resorts() {
        let mut store = EntryStore::open(MemoryStore::new());
        let older = store.add(fields("2025-01-01", 1.0));
        store.add(fields("2025-02-01", 2.0));

        let update = EntryPatch {
            date: Some("2025-03-01".to_string()),
            pay: Some(Pay::Hourly {
                hours: 2.0,
                rate: 15.0,
            }),
            note: None,
        }
        .validate()
        .unwrap();
        let updated = store.update(older.id, &update).unwrap();

        assert!((updated.value - 30.0).abs() < f64::EPSILON);
        assert_eq!(store.all()[0].id, older.id);
        assert_eq!(
            store.all()[0].parsed_date(),
            NaiveDate::from_ymd_opt(2025, 3, 1)
        );
    }

    #[test]
    fn clear_empties_collection() {
        let mut store = EntryStore::open(MemoryStore::new());
        store.add(fields("2025-03-01", 1.0));
        store.clear();
        assert!(store.all().is_empty());
    }

    #[test]
    fn mutations_persist_across_reopen() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("minijob.db");

        let kept = {
            let mut store = EntryStore::open(Database::open(&path).unwrap());
            let kept = store.add(fields("2025-03-01", 10.0));
            let dropped = store.add(fields("2025-03-02", 20.0));
            store.remove(dropped.id);
            assert!(store.is_persistent());
            kept
        };

        let store = EntryStore::open(Database::open(&path).unwrap());
        assert_eq!(store.all(), std::slice::from_ref(&kept));
    }

    #[test]
    fn loads_snapshot_in_browser_record_format() {
        let mut backend = MemoryStore::new();
        backend
            .set(
                ENTRIES_KEY,
                r#"[
                    {"id":1,"date":"2025-03-01","type":"daily","value":50,"hours":0,"rate":0,"note":""},
                    {"id":2,"date":"2025-03-05","type":"hourly","value":96.15,"hours":7.5,"rate":12.82,"note":"cafe"}
                ]"#,
            )
            .unwrap();

        let store = EntryStore::open(backend);
        assert_eq!(dates(&store), vec!["2025-03-05", "2025-03-01"]);
        assert_eq!(store.all()[0].note, "cafe");
    }

    #[test]
    fn unreadable_records_are_skipped() {
        let mut backend = MemoryStore::new();
        backend
            .set(
                ENTRIES_KEY,
                r#"[{"id":1,"date":"2025-03-01","type":"daily","value":5},{"id":"bad"}]"#,
            )
            .unwrap();
        let store = EntryStore::open(backend);
        assert_eq!(store.all().len(), 1);
    }

    #[test]
    fn records_without_positive_value_are_skipped() {
        let mut backend = MemoryStore::new();
        backend
            .set(
                ENTRIES_KEY,
                r#"[
                    {"id":1,"date":"2025-03-01","type":"daily","value":-5},
                    {"id":2,"date":"2025-03-02","type":"daily","value":0},
                    {"id":3,"date":"2025-03-03","type":"daily","value":null},
                    {"id":4,"date":"2025-03-04","type":"daily","value":12.5}
                ]"#,
            )
            .unwrap();

        let store = EntryStore::open(backend);
        assert!(store.is_persistent());
        assert_eq!(dates(&store), vec!["2025-03-04"]);
        let days = mj_core::daily_breakdown(store.all(), 2025, 3);
        assert!(days.iter().all(|day| day.total >= 0.0));
    }

    #[test]
    fn add_after_maximum_stored_id_reuses_a_free_id() {
        let mut backend = MemoryStore::new();
        backend
            .set(
                ENTRIES_KEY,
                r#"[
                    {"id":9223372036854775807,"date":"2025-03-01","type":"daily","value":5},
                    {"id":1,"date":"2025-03-02","type":"daily","value":5}
                ]"#,
            )
            .unwrap();

        let mut store = EntryStore::open(backend);
        let added = store.add(fields("2025-03-03", 1.0));
        assert_eq!(added.id.get(), 2);
        assert_eq!(store.all().len(), 3);
    }

    #[test]
    fn entries_with_invalid_dates_sort_last() {
        let mut backend = MemoryStore::new();
        backend
            .set(
                ENTRIES_KEY,
                r#"[{"id":1,"date":"garbage","type":"daily","value":5},{"id":2,"date":"2024-01-01","type":"daily","value":5}]"#,
            )
            .unwrap();
        let store = EntryStore::open(backend);
        assert_eq!(dates(&store), vec!["2024-01-01", "garbage"]);
    }

    #[test]
    fn corrupt_snapshot_degrades_without_overwriting() {
        let mut backend = MemoryStore::new();
        backend.set(ENTRIES_KEY, "{not json").unwrap();

        let mut store = EntryStore::open(backend);
        assert!(!store.is_persistent());
        assert!(store.take_warning().is_some());
        assert!(store.take_warning().is_none());

        store.add(fields("2025-03-01", 1.0));
        assert_eq!(store.all().len(), 1);
    }

    #[test]
    fn unreadable_backend_degrades_on_open() {
        let db = Database::open_in_memory().unwrap();
        db.conn.execute_batch("DROP TABLE kv;").unwrap();

        let mut store = EntryStore::open(db);
        assert!(!store.is_persistent());
        assert!(store.take_warning().is_some());

        store.add(fields("2025-03-01", 1.0));
        assert_eq!(store.all().len(), 1);
    }

    #[test]
    fn failed_write_degrades_to_memory() {
        let mut store = EntryStore::open(Database::open_in_memory().unwrap());
        assert!(store.is_persistent());
        if let Some(db) = store.backend() {
            db.conn.execute_batch("DROP TABLE kv;").unwrap();
        }

        let entry = store.add(fields("2025-03-01", 1.0));
        assert!(!store.is_persistent());
        let warning = store.take_warning().expect("warning after failed write");
        assert!(warning.message().contains("could not save entries"));
        assert_eq!(store.get(entry.id), Some(&entry));
    }

    #[test]
    fn detached_store_works_in_memory() {
        let mut store: EntryStore<MemoryStore> = EntryStore::detached();
        assert!(!store.is_persistent());
        let entry = store.add(fields("2025-03-01", 1.0));
        assert!(store.remove(entry.id));
    }
}
