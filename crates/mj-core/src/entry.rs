//! Work entries and the validation applied when they are submitted or edited.
//!
//! An entry's `value` is derived from its [`Pay`] at submit time and stored.
//! It is never recomputed from stored hours and rate afterwards, and an edit
//! can only change it by supplying a whole new [`Pay`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entry_type::EntryType;
use crate::rate;
use crate::types::{EntryId, ValidationError};

/// Storage format of [`Entry::date`].
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single recorded unit of work.
///
/// The date is kept as the stored string so a corrupt record still loads;
/// aggregation skips entries whose date does not parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    #[serde(default)]
    pub date: String,
    #[serde(rename = "type")]
    pub kind: EntryType,
    pub value: f64,
    #[serde(default)]
    pub hours: f64,
    #[serde(default)]
    pub rate: f64,
    #[serde(default)]
    pub note: String,
}

impl Entry {
    /// Builds a stored entry from validated fields.
    pub fn new(id: EntryId, fields: EntryFields) -> Self {
        let EntryFields { date, pay, note } = fields;
        Self {
            id,
            date: format_date(date),
            kind: pay.kind(),
            value: pay.value(),
            hours: pay.hours(),
            rate: pay.rate(),
            note,
        }
    }

    /// The entry date, or `None` if the stored string is missing or malformed.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }

    /// Merges a validated update into this entry.
    pub fn apply(&mut self, update: &EntryUpdate) {
        if let Some(date) = update.date {
            self.date = format_date(date);
        }
        if let Some(pay) = update.pay {
            self.kind = pay.kind();
            self.value = pay.value();
            self.hours = pay.hours();
            self.rate = pay.rate();
        }
        if let Some(note) = &update.note {
            self.note.clone_from(note);
        }
    }

    /// The fields that identify this entry's content, without its id.
    pub fn fields(&self) -> Option<EntryFields> {
        let pay = match self.kind {
            EntryType::Daily => Pay::Daily { amount: self.value },
            EntryType::Hourly => Pay::Hourly {
                hours: self.hours,
                rate: self.rate,
            },
        };
        Some(EntryFields {
            date: self.parsed_date()?,
            pay,
            note: self.note.clone(),
        })
    }
}

/// How an entry is paid; the only source of an entry's value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pay {
    Daily { amount: f64 },
    Hourly { hours: f64, rate: f64 },
}

impl Pay {
    pub const fn kind(&self) -> EntryType {
        match self {
            Self::Daily { .. } => EntryType::Daily,
            Self::Hourly { .. } => EntryType::Hourly,
        }
    }

    pub fn value(&self) -> f64 {
        match *self {
            Self::Daily { amount } => amount,
            Self::Hourly { hours, rate } => rate::amount(hours, rate),
        }
    }

    pub const fn hours(&self) -> f64 {
        match *self {
            Self::Daily { .. } => 0.0,
            Self::Hourly { hours, .. } => hours,
        }
    }

    pub const fn rate(&self) -> f64 {
        match *self {
            Self::Daily { .. } => 0.0,
            Self::Hourly { rate, .. } => rate,
        }
    }

    fn validate(self) -> Result<Self, ValidationError> {
        if let Self::Hourly { hours, rate } = self {
            if hours < 0.0 {
                return Err(ValidationError::Negative {
                    field: "hours",
                    value: hours,
                });
            }
            if rate < 0.0 {
                return Err(ValidationError::Negative {
                    field: "rate",
                    value: rate,
                });
            }
        }
        let value = self.value();
        if !value.is_finite() || value <= 0.0 {
            return Err(ValidationError::NonPositiveValue { value });
        }
        Ok(self)
    }
}

/// Validated content of a new entry.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryFields {
    pub date: NaiveDate,
    pub pay: Pay,
    pub note: String,
}

/// Raw user submission for a new entry.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDraft {
    pub date: Option<String>,
    pub pay: Pay,
    pub note: Option<String>,
}

impl EntryDraft {
    /// Checks the value first and the date second, then trims the note.
    pub fn validate(self) -> Result<EntryFields, ValidationError> {
        let pay = self.pay.validate()?;
        let date = match self.date.as_deref().map(str::trim) {
            None | Some("") => return Err(ValidationError::MissingDate),
            Some(raw) => parse_date(raw).ok_or_else(|| ValidationError::InvalidDate {
                value: raw.to_string(),
            })?,
        };
        Ok(EntryFields {
            date,
            pay,
            note: normalize_note(self.note.as_deref()),
        })
    }
}

/// Raw partial edit of an existing entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryPatch {
    pub date: Option<String>,
    pub pay: Option<Pay>,
    pub note: Option<String>,
}

impl EntryPatch {
    pub const fn is_empty(&self) -> bool {
        self.date.is_none() && self.pay.is_none() && self.note.is_none()
    }

    /// Validates the supplied fields with the same rules as a new entry.
    pub fn validate(self) -> Result<EntryUpdate, ValidationError> {
        let pay = self.pay.map(Pay::validate).transpose()?;
        let date = match self.date.as_deref().map(str::trim) {
            None => None,
            Some("") => return Err(ValidationError::MissingDate),
            Some(raw) => Some(parse_date(raw).ok_or_else(|| ValidationError::InvalidDate {
                value: raw.to_string(),
            })?),
        };
        Ok(EntryUpdate {
            date,
            pay,
            note: self.note.as_deref().map(|note| normalize_note(Some(note))),
        })
    }
}

/// A validated partial edit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryUpdate {
    pub date: Option<NaiveDate>,
    pub pay: Option<Pay>,
    pub note: Option<String>,
}

/// Parses a stored `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// Formats a date the way entries store it.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn normalize_note(note: Option<&str>) -> String {
    note.map(str::trim).unwrap_or_default().to_string()
}
