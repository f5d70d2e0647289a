//! List command for every stored entry.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use mj_db::KeyValueStore;

use crate::app::App;
use crate::render::render_entries;

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Output as JSON, in the stored record format.
    #[arg(long)]
    pub json: bool,
}

pub fn run<W: Write, B: KeyValueStore>(writer: &mut W, app: &App<B>, args: &ListArgs) -> Result<()> {
    let entries = app.store.all();
    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(entries)?)?;
    } else {
        render_entries(writer, entries, &app.config.base_currency)?;
    }
    Ok(())
}
