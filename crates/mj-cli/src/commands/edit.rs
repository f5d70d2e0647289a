//! Edit command for changing an existing entry.

use std::io::Write;

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use mj_core::{EntryId, EntryPatch, EntryType, Pay};
use mj_db::{KeyValueStore, StoreError};

use crate::app::App;
use crate::commands::util::{EntryMeta, HoursArgs};
use crate::render::entry_line;

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Entry id, as shown after `#` in listings.
    pub id: EntryId,

    #[command(flatten)]
    pub meta: EntryMeta,

    #[command(subcommand)]
    pub pay: Option<EditPay>,
}

/// Replacement pay; the value is recomputed from it.
#[derive(Debug, Subcommand)]
pub enum EditPay {
    /// Make this a fixed daily amount.
    Daily {
        /// Amount earned.
        #[arg(allow_negative_numbers = true)]
        amount: f64,
    },

    /// Make this hourly work.
    Hourly {
        #[command(flatten)]
        hours: HoursArgs,

        /// Hourly rate; defaults to the entry's current rate.
        #[arg(long)]
        rate: Option<f64>,
    },
}

pub fn run<W: Write, B: KeyValueStore>(
    writer: &mut W,
    app: &mut App<B>,
    args: &EditArgs,
) -> Result<()> {
    let Some(existing) = app.store.get(args.id) else {
        return Err(StoreError::NotFound(args.id).into());
    };

    let pay = match &args.pay {
        None => None,
        Some(EditPay::Daily { amount }) => Some(Pay::Daily { amount: *amount }),
        Some(EditPay::Hourly { hours, rate }) => {
            let rate = match rate {
                Some(rate) => *rate,
                None if existing.kind == EntryType::Hourly && existing.rate > 0.0 => existing.rate,
                None => app.hourly_rate(),
            };
            Some(hours.to_input()?.to_pay(rate))
        }
    };

    let patch = EntryPatch {
        date: args.meta.date.clone(),
        pay,
        note: args.meta.note.clone(),
    };
    if patch.is_empty() {
        bail!("nothing to change: pass --date, --note, or a new daily/hourly pay");
    }

    let update = patch.validate()?;
    let entry = app.store.update(args.id, &update)?;
    writeln!(
        writer,
        "Updated {}",
        entry_line(&entry, &app.config.base_currency)
    )?;
    Ok(())
}
