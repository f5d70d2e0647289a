//! Core domain logic for the minijob earnings tracker.
//!
//! This crate contains the fundamental types and logic for:
//! - Entries: daily or hourly work records and their validation
//! - Aggregation: monthly totals and dense per-day breakdowns
//! - Rate calculation: hours from a shift time range, amounts from hours
//! - Currency: cached exchange rates and conversion

pub mod aggregate;
pub mod currency;
pub mod entry;
pub mod entry_type;
pub mod month;
pub mod rate;
pub mod types;

pub use aggregate::{
    DayTotal, MonthSummary, daily_breakdown, days_in_month, entries_for_month, month_total,
};
pub use currency::{CachedRate, DEFAULT_STALENESS_SECS};
pub use entry::{Entry, EntryDraft, EntryFields, EntryPatch, EntryUpdate, Pay};
pub use entry_type::{EntryType, UnknownEntryType};
pub use month::YearMonth;
pub use rate::{HourMode, HourlyInput, amount, hours_from_range};
pub use types::{CurrencyCode, EntryId, ValidationError};
