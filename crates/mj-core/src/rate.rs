//! Rate calculator: converts worked hours or a shift time range into money.
//!
//! Amounts are never rounded here; rounding to cents is a display concern.

use chrono::{NaiveTime, Timelike};

use crate::entry::Pay;

const MINUTES_PER_DAY: i64 = 24 * 60;
const TIME_FORMAT: &str = "%H:%M";

/// Parses an `HH:MM` time of day.
pub fn parse_time_of_day(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT).ok()
}

/// Hours worked between two `HH:MM` times, minus a break.
///
/// An end time before the start time is an overnight shift and wraps past
/// midnight. Missing or unparseable times yield 0, and the result is never
/// negative.
pub fn hours_from_range(start: &str, end: &str, break_minutes: u32) -> f64 {
    let (Some(start), Some(end)) = (parse_time_of_day(start), parse_time_of_day(end)) else {
        return 0.0;
    };
    shift_hours(start, end, break_minutes)
}

/// Hours worked between two parsed times, minus a break.
#[allow(clippy::cast_precision_loss)]
pub fn shift_hours(start: NaiveTime, end: NaiveTime, break_minutes: u32) -> f64 {
    let mut elapsed = minute_of_day(end) - minute_of_day(start);
    if elapsed < 0 {
        elapsed += MINUTES_PER_DAY;
    }
    let worked = (elapsed - i64::from(break_minutes)).max(0);
    worked as f64 / 60.0
}

fn minute_of_day(time: NaiveTime) -> i64 {
    i64::from(time.hour() * 60 + time.minute())
}

/// Money earned for `hours` at `rate`.
pub fn amount(hours: f64, rate: f64) -> f64 {
    hours * rate
}

/// Which input an hourly entry takes its hours from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HourMode {
    /// Hours typed directly.
    #[default]
    Manual,
    /// Hours derived from a start/end time range.
    Range,
}

/// Hours input for an hourly entry.
///
/// Exactly one mode is active. Switching modes discards the other mode's
/// values, and [`HourlyInput::hours`] always recomputes from the active one.
#[derive(Debug, Clone, PartialEq)]
pub enum HourlyInput {
    Manual {
        hours: f64,
    },
    Range {
        start: String,
        end: String,
        break_minutes: u32,
    },
}

impl Default for HourlyInput {
    fn default() -> Self {
        Self::Manual { hours: 0.0 }
    }
}

impl HourlyInput {
    pub const fn manual(hours: f64) -> Self {
        Self::Manual { hours }
    }

    pub fn range(start: impl Into<String>, end: impl Into<String>, break_minutes: u32) -> Self {
        Self::Range {
            start: start.into(),
            end: end.into(),
            break_minutes,
        }
    }

    pub const fn mode(&self) -> HourMode {
        match self {
            Self::Manual { .. } => HourMode::Manual,
            Self::Range { .. } => HourMode::Range,
        }
    }

    /// Activates `mode`, resetting its inputs if it was not already active.
    pub fn switch_to(&mut self, mode: HourMode) {
        if self.mode() == mode {
            return;
        }
        *self = match mode {
            HourMode::Manual => Self::manual(0.0),
            HourMode::Range => Self::range("", "", 0),
        };
    }

    /// Hours according to the active mode.
    pub fn hours(&self) -> f64 {
        match self {
            Self::Manual { hours } => *hours,
            Self::Range {
                start,
                end,
                break_minutes,
            } => hours_from_range(start, end, *break_minutes),
        }
    }

    /// Live preview of the amount at `rate`.
    pub fn amount(&self, rate: f64) -> f64 {
        amount(self.hours(), rate)
    }

    /// Folds the input into the pay of an hourly entry.
    pub fn to_pay(&self, rate: f64) -> Pay {
        Pay::Hourly {
            hours: self.hours(),
            rate,
        }
    }
}
