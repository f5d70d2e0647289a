//! Add command for recording a new entry.

use std::io::Write;

use anyhow::Result;
use clap::{Args, Subcommand};
use mj_core::entry::format_date;
use mj_core::{EntryDraft, Pay};
use mj_db::KeyValueStore;

use crate::app::App;
use crate::commands::util::{EntryMeta, HoursArgs};
use crate::render::entry_line;

#[derive(Debug, Args)]
pub struct AddArgs {
    #[command(subcommand)]
    pub pay: AddPay,
}

/// How the new entry is paid.
#[derive(Debug, Subcommand)]
pub enum AddPay {
    /// A fixed amount for the day.
    Daily {
        /// Amount earned.
        #[arg(allow_negative_numbers = true)]
        amount: f64,

        #[command(flatten)]
        meta: EntryMeta,
    },

    /// Hours worked at an hourly rate.
    Hourly {
        #[command(flatten)]
        hours: HoursArgs,

        /// Hourly rate; defaults to the saved rate and is saved when given.
        #[arg(long)]
        rate: Option<f64>,

        #[command(flatten)]
        meta: EntryMeta,
    },
}

pub fn run<W: Write, B: KeyValueStore>(
    writer: &mut W,
    app: &mut App<B>,
    args: &AddArgs,
) -> Result<()> {
    let (pay, meta, new_rate) = match &args.pay {
        AddPay::Daily { amount, meta } => (Pay::Daily { amount: *amount }, meta, None),
        AddPay::Hourly { hours, rate, meta } => {
            let input = hours.to_input()?;
            let effective = rate.unwrap_or_else(|| app.hourly_rate());
            (input.to_pay(effective), meta, *rate)
        }
    };

    let fields = EntryDraft {
        date: Some(
            meta.date
                .clone()
                .unwrap_or_else(|| format_date(app.today)),
        ),
        pay,
        note: meta.note.clone(),
    }
    .validate()?;

    if let Some(rate) = new_rate {
        app.set_hourly_rate(rate)?;
    }

    let entry = app.store.add(fields);
    writeln!(
        writer,
        "Added {}",
        entry_line(&entry, &app.config.base_currency)
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    use crate::app::tests::test_app;

    fn add(app: &mut App<mj_db::MemoryStore>, pay: AddPay) -> Result<String> {
        let mut output = Vec::new();
        run(&mut output, app, &AddArgs { pay })?;
        Ok(String::from_utf8(output).unwrap())
    }

    fn meta(date: Option<&str>, note: Option<&str>) -> EntryMeta {
        EntryMeta {
            date: date.map(str::to_string),
            note: note.map(str::to_string),
        }
    }

    #[test]
    fn add_daily_defaults_to_today() {
        let mut app = test_app();
        add(
            &mut app,
            AddPay::Daily {
                amount: 50.0,
                meta: meta(None, Some("market")),
            },
        )
        .unwrap();

        let entries = app.store.all();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].date, "2025-03-14");
        assert_eq!(entries[0].note, "market");
        assert!((entries[0].value - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn add_hourly_from_shift_uses_saved_rate() {
        let mut app = test_app();
        app.set_hourly_rate(10.0).unwrap();
        let output = add(
            &mut app,
            AddPay::Hourly {
                hours: HoursArgs {
                    start: Some("09:00".to_string()),
                    end: Some("17:00".to_string()),
                    break_minutes: Some(30),
                    ..HoursArgs::default()
                },
                rate: None,
                meta: meta(Some("2025-03-10"), None),
            },
        )
        .unwrap();

        let entry = &app.store.all()[0];
        assert!((entry.hours - 7.5).abs() < f64::EPSILON);
        assert!((entry.value - 75.0).abs() < f64::EPSILON);
        let line = format!("2025-03-10     €75.00  Hourly work (7.5h × €10.00)  #{}", entry.id);
        assert_eq!(output.trim_end(), format!("Added {line}"));
    }

    #[test]
    fn add_hourly_with_rate_saves_default() {
        let mut app = test_app();
        add(
            &mut app,
            AddPay::Hourly {
                hours: HoursArgs {
                    hours: Some(2.0),
                    ..HoursArgs::default()
                },
                rate: Some(15.0),
                meta: EntryMeta::default(),
            },
        )
        .unwrap();
        assert!((app.hourly_rate() - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn add_rejects_zero_amount() {
        let mut app = test_app();
        let err = add(
            &mut app,
            AddPay::Daily {
                amount: 0.0,
                meta: EntryMeta::default(),
            },
        )
        .unwrap_err();
        assert_snapshot!(err.to_string(), @"amount must be greater than zero, got 0");
        assert!(app.store.all().is_empty());
    }

    #[test]
    fn add_rejects_invalid_date() {
        let mut app = test_app();
        let err = add(
            &mut app,
            AddPay::Daily {
                amount: 10.0,
                meta: meta(Some("2025-02-30"), None),
            },
        )
        .unwrap_err();
        assert_snapshot!(err.to_string(), @"invalid date: 2025-02-30 (expected YYYY-MM-DD)");
        assert!(app.store.all().is_empty());
    }

    #[test]
    fn invalid_entry_does_not_save_rate() {
        let mut app = test_app();
        let result = add(
            &mut app,
            AddPay::Hourly {
                hours: HoursArgs {
                    hours: Some(0.0),
                    ..HoursArgs::default()
                },
                rate: Some(20.0),
                meta: EntryMeta::default(),
            },
        );
        assert!(result.is_err());
        assert!((app.hourly_rate() - 12.82).abs() < f64::EPSILON);
    }
}
