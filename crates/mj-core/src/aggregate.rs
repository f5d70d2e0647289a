//! Monthly aggregation of entries.
//!
//! Every function here is pure. Months are 1-indexed (1 = January). Entries
//! whose date is missing or unparseable are skipped by all of them.

use chrono::Datelike;
use serde::Serialize;

use crate::entry::Entry;
use crate::month::YearMonth;

/// Earnings on one day of a month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DayTotal {
    /// Day of month, starting at 1.
    pub day: u32,
    pub total: f64,
}

/// Number of days in `month` of `year`, or `None` for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let selection = YearMonth::new(year, month)?;
    let first = selection.first_day()?;
    match selection.next().and_then(YearMonth::first_day) {
        Some(next) => u32::try_from((next - first).num_days()).ok(),
        // December of the last supported year
        None => Some(31),
    }
}

/// Entries dated in `month` of `year`, in their input order.
pub fn entries_for_month(entries: &[Entry], year: i32, month: u32) -> Vec<&Entry> {
    let Some(selection) = YearMonth::new(year, month) else {
        return Vec::new();
    };
    entries
        .iter()
        .filter(|entry| entry.parsed_date().is_some_and(|date| selection.contains(date)))
        .collect()
}

/// Sum of `value` over `entries`; zero when empty.
pub fn month_total<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> f64 {
    entries.into_iter().map(|entry| entry.value).sum()
}

/// One bucket per day of the month, zero where nothing was earned.
///
/// Entries outside the month or without a valid date are ignored.
pub fn daily_breakdown<'a>(
    entries: impl IntoIterator<Item = &'a Entry>,
    year: i32,
    month: u32,
) -> Vec<DayTotal> {
    let (Some(selection), Some(days)) = (YearMonth::new(year, month), days_in_month(year, month))
    else {
        return Vec::new();
    };

    let mut buckets: Vec<DayTotal> = (1..=days).map(|day| DayTotal { day, total: 0.0 }).collect();
    for entry in entries {
        let Some(date) = entry.parsed_date() else {
            tracing::trace!(id = %entry.id, date = %entry.date, "skipping entry with invalid date");
            continue;
        };
        if !selection.contains(date) {
            continue;
        }
        if let Some(bucket) = buckets.get_mut(date.day0() as usize) {
            bucket.total += entry.value;
        }
    }
    buckets
}

/// Everything a month view renders, derived in one pass over the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthSummary {
    pub month: YearMonth,
    pub entries: Vec<Entry>,
    pub total: f64,
    pub days: Vec<DayTotal>,
}

impl MonthSummary {
    pub fn build(entries: &[Entry], month: YearMonth) -> Self {
        let selected = entries_for_month(entries, month.year(), month.month());
        let total = month_total(selected.iter().copied());
        let days = daily_breakdown(selected.iter().copied(), month.year(), month.month());
        Self {
            month,
            entries: selected.into_iter().cloned().collect(),
            total,
            days,
        }
    }

    /// The day with the highest total, if anything was earned.
    pub fn best_day(&self) -> Option<DayTotal> {
        self.days
            .iter()
            .copied()
            .filter(|day| day.total > 0.0)
            .max_by(|a, b| a.total.total_cmp(&b.total))
    }
}
