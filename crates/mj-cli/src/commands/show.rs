//! Show command for the month view.
//!
//! Prints the selected month's total, an optional converted total, a per-day
//! chart and the month's entries, or the same data as JSON with `--json`.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use mj_core::currency::convert;
use mj_core::{CurrencyCode, DayTotal, Entry, MonthSummary, YearMonth};
use mj_db::KeyValueStore;
use serde::Serialize;

use crate::app::App;
use crate::fx::{RateFetcher, resolve_rate};
use crate::render::{Conversion, render_month};

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Month to show (YYYY-MM); defaults to the current month.
    #[arg(long)]
    pub month: Option<YearMonth>,

    /// Move back this many months.
    #[arg(long, value_name = "N", conflicts_with = "next")]
    pub prev: Option<u16>,

    /// Move forward this many months.
    #[arg(long, value_name = "N")]
    pub next: Option<u16>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

/// The month selected by `args`, relative to `current`.
///
/// `None` when the offset moves past the supported years.
pub fn selected_month(args: &ShowArgs, current: YearMonth) -> Option<YearMonth> {
    let base = args.month.unwrap_or(current);
    let offset = i32::from(args.next.unwrap_or(0)) - i32::from(args.prev.unwrap_or(0));
    base.shift(offset)
}

pub fn run<W: Write, B: KeyValueStore>(
    writer: &mut W,
    app: &mut App<B>,
    args: &ShowArgs,
    fetcher: &dyn RateFetcher,
    now: DateTime<Utc>,
) -> Result<()> {
    let month = selected_month(args, app.current_month())
        .context("selected month is out of range")?;
    let summary = app.month_summary(month);
    tracing::debug!(%month, total = summary.total, "month summarized");

    let conversion = resolve_rate(app, fetcher, now, false).map(|resolved| Conversion {
        target: app.config.target_currency.clone(),
        rate: resolved.rate.rate,
    });

    let currency = &app.config.base_currency;
    if args.json {
        let json = format_month_json(&summary, currency, conversion.as_ref())?;
        writeln!(writer, "{json}")?;
    } else {
        render_month(writer, &summary, currency, conversion.as_ref())?;
    }
    Ok(())
}

/// JSON month view.
#[derive(Debug, Serialize)]
pub struct JsonMonth<'a> {
    pub month: String,
    pub currency: &'a CurrencyCode,
    pub total: f64,
    pub entry_count: usize,
    pub days: &'a [DayTotal],
    pub entries: &'a [Entry],
    pub conversion: Option<JsonConversion<'a>>,
}

#[derive(Debug, Serialize)]
pub struct JsonConversion<'a> {
    pub currency: &'a CurrencyCode,
    pub rate: f64,
    pub total: f64,
}

/// Formats a month summary as pretty-printed JSON.
pub fn format_month_json(
    summary: &MonthSummary,
    currency: &CurrencyCode,
    conversion: Option<&Conversion>,
) -> Result<String> {
    let month = JsonMonth {
        month: summary.month.to_string(),
        currency,
        total: summary.total,
        entry_count: summary.entries.len(),
        days: &summary.days,
        entries: &summary.entries,
        conversion: conversion.map(|conversion| JsonConversion {
            currency: &conversion.target,
            rate: conversion.rate,
            total: convert(summary.total, conversion.rate),
        }),
    };
    Ok(serde_json::to_string_pretty(&month)?)
}
