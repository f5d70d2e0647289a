//! Core type definitions with validation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for user input and core types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// No date was supplied.
    #[error("a date is required")]
    MissingDate,

    /// The date was not a valid `YYYY-MM-DD` calendar date.
    #[error("invalid date: {value} (expected YYYY-MM-DD)")]
    InvalidDate { value: String },

    /// The derived monetary value was zero, negative or not a number.
    #[error("amount must be greater than zero, got {value}")]
    NonPositiveValue { value: f64 },

    /// A component of an hourly value was negative.
    #[error("{field} cannot be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    /// The time of day was not `HH:MM`.
    #[error("invalid time: {value} (expected HH:MM)")]
    InvalidTime { value: String },

    /// The month selection was not `YYYY-MM` or out of range.
    #[error("invalid month: {value} (expected YYYY-MM)")]
    InvalidMonth { value: String },

    /// The currency code was not three ASCII letters.
    #[error("invalid currency code: {value}")]
    InvalidCurrencyCode { value: String },
}

/// Identifier of a stored entry.
///
/// Derived from the creation time in milliseconds; the store guarantees
/// uniqueness, not the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(i64);

impl EntryId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntryId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// A validated ISO 4217 currency code, stored upper-case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Creates a currency code after validation.
    pub fn new(code: impl Into<String>) -> Result<Self, ValidationError> {
        let code = code.into();
        let trimmed = code.trim();
        if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ValidationError::InvalidCurrencyCode { value: code });
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Display symbol for the currencies the app knows about, falling back to the code.
    pub fn symbol(&self) -> &str {
        match self.0.as_str() {
            "EUR" => "€",
            "TRY" => "₺",
            "USD" => "$",
            "GBP" => "£",
            other => other,
        }
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl FromStr for CurrencyCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_id_parses_and_displays() {
        let id: EntryId = " 1700000000000 ".parse().unwrap();
        assert_eq!(id.get(), 1_700_000_000_000);
        assert_eq!(id.to_string(), "1700000000000");
    }

    #[test]
    fn entry_id_rejects_garbage() {
        assert!("abc".parse::<EntryId>().is_err());
    }

    #[test]
    fn currency_code_is_uppercased() {
        let code = CurrencyCode::new("try").unwrap();
        assert_eq!(code.as_str(), "TRY");
        assert_eq!(code.symbol(), "₺");
    }

    #[test]
    fn currency_code_rejects_wrong_length() {
        assert_eq!(
            CurrencyCode::new("EURO"),
            Err(ValidationError::InvalidCurrencyCode {
                value: "EURO".to_string()
            })
        );
    }

    #[test]
    fn currency_code_rejects_digits() {
        assert!(CurrencyCode::new("E1R").is_err());
    }

    #[test]
    fn unknown_currency_symbol_falls_back_to_code() {
        let code = CurrencyCode::new("chf").unwrap();
        assert_eq!(code.symbol(), "CHF");
    }
}
