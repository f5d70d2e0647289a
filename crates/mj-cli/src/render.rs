//! Plain-text rendering of entries and month summaries.
//!
//! Everything writes to a caller-supplied sink so output can be asserted in
//! tests without a terminal.

use std::io::{self, Write};

use mj_core::currency::convert;
use mj_core::{CurrencyCode, DayTotal, Entry, EntryType, MonthSummary};

/// Levels used by [`sparkline`], lowest first.
const LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// A rate for showing the month total in a second currency.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub target: CurrencyCode,
    pub rate: f64,
}

/// Formats an amount with two decimals, e.g. `€96.15`.
pub fn format_money(amount: f64, currency: &CurrencyCode) -> String {
    format!("{}{amount:.2}", currency.symbol())
}

/// Formats hours without trailing zeros, e.g. `7.5h` or `8h`.
pub fn format_hours(hours: f64) -> String {
    let fixed = format!("{hours:.2}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed}h")
}

/// The note, or a label for the entry kind when there is none.
pub fn entry_title(entry: &Entry) -> &str {
    if !entry.note.is_empty() {
        return &entry.note;
    }
    match entry.kind {
        EntryType::Daily => "Daily work",
        EntryType::Hourly => "Hourly work",
    }
}

/// One line describing an entry.
pub fn entry_line(entry: &Entry, currency: &CurrencyCode) -> String {
    let money = format_money(entry.value, currency);
    let title = entry_title(entry);
    let date = if entry.date.is_empty() {
        "(no date)"
    } else {
        entry.date.as_str()
    };
    match entry.kind {
        EntryType::Daily => format!("{date}  {money:>9}  {title}  #{}", entry.id),
        EntryType::Hourly => format!(
            "{date}  {money:>9}  {title} ({} × {})  #{}",
            format_hours(entry.hours),
            format_money(entry.rate, currency),
            entry.id
        ),
    }
}

/// Writes one line per entry, or a placeholder for an empty list.
pub fn render_entries<W: Write>(
    writer: &mut W,
    entries: &[Entry],
    currency: &CurrencyCode,
) -> io::Result<()> {
    if entries.is_empty() {
        writeln!(writer, "No entries yet.")?;
        return Ok(());
    }
    for entry in entries {
        writeln!(writer, "{}", entry_line(entry, currency))?;
    }
    Ok(())
}

/// One character per day, scaled to the best day; `·` marks days without earnings.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn sparkline(days: &[DayTotal]) -> String {
    let max = days.iter().map(|day| day.total).fold(0.0_f64, f64::max);
    days.iter()
        .map(|day| {
            if day.total <= 0.0 || max <= 0.0 {
                return '·';
            }
            let level = (day.total / max * LEVELS.len() as f64).ceil() as usize;
            LEVELS[level.clamp(1, LEVELS.len()) - 1]
        })
        .collect()
}

/// Day numbers under a [`sparkline`]: the first day left, the last day right.
pub fn day_axis(days: &[DayTotal]) -> String {
    match (days.first(), days.last()) {
        (Some(first), Some(last)) if days.len() > 1 => {
            let last_label = last.day.to_string();
            let first_label = first.day.to_string();
            let gap = days
                .len()
                .saturating_sub(first_label.len() + last_label.len());
            format!("{first_label}{}{last_label}", " ".repeat(gap))
        }
        (Some(only), _) => only.day.to_string(),
        _ => String::new(),
    }
}

/// Writes the month header, total, optional conversion, chart and entries.
pub fn render_month<W: Write>(
    writer: &mut W,
    summary: &MonthSummary,
    currency: &CurrencyCode,
    conversion: Option<&Conversion>,
) -> io::Result<()> {
    let header = format!("{} {}", summary.month.month_name(), summary.month.year());
    writeln!(writer, "{header}")?;
    writeln!(writer, "{}", "─".repeat(header.chars().count()))?;

    let count = summary.entries.len();
    let noun = if count == 1 { "entry" } else { "entries" };
    writeln!(
        writer,
        "Total: {} ({count} {noun})",
        format_money(summary.total, currency)
    )?;
    if let Some(conversion) = conversion {
        writeln!(
            writer,
            "≈ {} (1 {currency} = {:.4} {})",
            format_money(convert(summary.total, conversion.rate), &conversion.target),
            conversion.rate,
            conversion.target
        )?;
    }

    if summary.entries.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "No entries this month.")?;
        return Ok(());
    }

    writeln!(writer)?;
    writeln!(writer, "{}", sparkline(&summary.days))?;
    writeln!(writer, "{}", day_axis(&summary.days))?;
    if let Some(best) = summary.best_day() {
        writeln!(
            writer,
            "Best day: {} {} ({})",
            summary.month.month_name(),
            best.day,
            format_money(best.total, currency)
        )?;
    }

    writeln!(writer)?;
    for entry in &summary.entries {
        writeln!(writer, "{}", entry_line(entry, currency))?;
    }
    Ok(())
}
