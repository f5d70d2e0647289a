//! Arguments shared by several commands.

use anyhow::{Result, bail};
use clap::Args;
use mj_core::rate::parse_time_of_day;
use mj_core::{HourlyInput, ValidationError};

/// Date and note of an entry.
#[derive(Debug, Clone, Default, Args)]
pub struct EntryMeta {
    /// Date worked (YYYY-MM-DD); defaults to today when adding.
    #[arg(long)]
    pub date: Option<String>,

    /// Free-text note.
    #[arg(long)]
    pub note: Option<String>,
}

/// Hours worked, typed directly or derived from a shift.
#[derive(Debug, Clone, Default, Args)]
pub struct HoursArgs {
    /// Hours worked.
    #[arg(long, conflicts_with_all = ["start", "end", "break_minutes"])]
    pub hours: Option<f64>,

    /// Shift start time (HH:MM).
    #[arg(long, requires = "end")]
    pub start: Option<String>,

    /// Shift end time (HH:MM); earlier than the start means overnight.
    #[arg(long, requires = "start")]
    pub end: Option<String>,

    /// Unpaid break in minutes.
    #[arg(long = "break", value_name = "MINUTES")]
    pub break_minutes: Option<u32>,
}

impl HoursArgs {
    /// The hourly input these arguments select.
    pub fn to_input(&self) -> Result<HourlyInput> {
        match (self.hours, &self.start, &self.end) {
            (Some(hours), _, _) => Ok(HourlyInput::manual(hours)),
            (None, Some(start), Some(end)) => {
                for value in [start, end] {
                    if parse_time_of_day(value).is_none() {
                        return Err(ValidationError::InvalidTime {
                            value: value.clone(),
                        }
                        .into());
                    }
                }
                Ok(HourlyInput::range(
                    start.as_str(),
                    end.as_str(),
                    self.break_minutes.unwrap_or(0),
                ))
            }
            _ => bail!("provide --hours, or both --start and --end"),
        }
    }
}
