//! Calc command: previews hours and pay for a shift without saving it.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use mj_db::KeyValueStore;

use crate::app::App;
use crate::commands::util::HoursArgs;
use crate::render::{format_hours, format_money};

#[derive(Debug, Args)]
pub struct CalcArgs {
    #[command(flatten)]
    pub hours: HoursArgs,

    /// Hourly rate; defaults to the saved rate.
    #[arg(long)]
    pub rate: Option<f64>,
}

pub fn run<W: Write, B: KeyValueStore>(writer: &mut W, app: &App<B>, args: &CalcArgs) -> Result<()> {
    let input = args.hours.to_input()?;
    let rate = args.rate.unwrap_or_else(|| app.hourly_rate());
    let currency = &app.config.base_currency;

    writeln!(writer, "Hours:  {}", format_hours(input.hours()))?;
    writeln!(writer, "Rate:   {}", format_money(rate, currency))?;
    writeln!(writer, "Amount: {}", format_money(input.amount(rate), currency))?;
    Ok(())
}
