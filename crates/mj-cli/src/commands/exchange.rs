//! Fx command for the exchange rate behind the converted total.

use std::io::Write;

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use clap::Args;
use mj_db::KeyValueStore;

use crate::app::App;
use crate::fx::{RateFetcher, RateSource, resolve_rate};

#[derive(Debug, Args)]
pub struct FxArgs {
    /// Fetch a new rate even if the cached one is still fresh.
    #[arg(long)]
    pub refresh: bool,
}

pub fn run<W: Write, B: KeyValueStore>(
    writer: &mut W,
    app: &mut App<B>,
    args: &FxArgs,
    fetcher: &dyn RateFetcher,
    now: DateTime<Utc>,
) -> Result<()> {
    if !app.config.conversion_enabled {
        writeln!(writer, "Currency conversion is disabled.")?;
        return Ok(());
    }

    let (from, to) = (
        app.config.base_currency.clone(),
        app.config.target_currency.clone(),
    );
    let Some(resolved) = resolve_rate(app, fetcher, now, args.refresh) else {
        bail!("exchange rate {from} → {to} is unavailable");
    };

    let origin = match resolved.source {
        RateSource::Cache => "cached",
        RateSource::Network => "fetched",
    };
    writeln!(
        writer,
        "1 {from} = {:.4} {to} ({origin} {})",
        resolved.rate.rate,
        resolved.rate.fetched_at.format("%Y-%m-%d %H:%M UTC")
    )?;
    Ok(())
}
