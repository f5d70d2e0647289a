//! Status command for storage and settings.

use std::io::Write;

use anyhow::Result;
use mj_db::{Database, settings};

use crate::app::App;
use crate::render::format_money;

pub fn run<W: Write>(writer: &mut W, app: &App<Database>) -> Result<()> {
    let config = &app.config;
    writeln!(writer, "minijob status")?;
    if app.store.is_persistent() {
        writeln!(writer, "Database: {}", config.database_path.display())?;
    } else {
        writeln!(
            writer,
            "Database: {} (unavailable, changes are not saved)",
            config.database_path.display()
        )?;
    }
    writeln!(writer, "Entries: {}", app.store.all().len())?;
    writeln!(
        writer,
        "Hourly rate: {}",
        format_money(app.hourly_rate(), &config.base_currency)
    )?;

    if config.conversion_enabled {
        writeln!(
            writer,
            "Conversion: {} → {}",
            config.base_currency, config.target_currency
        )?;
    } else {
        writeln!(writer, "Conversion: disabled")?;
    }

    let Some(db) = app.store.backend() else {
        return Ok(());
    };
    match settings::load_cached_rate(db)? {
        Some(cached) => writeln!(
            writer,
            "Cached rate: {:.4} (fetched {})",
            cached.rate,
            cached.fetched_at.format("%Y-%m-%d %H:%M UTC")
        )?,
        None => writeln!(writer, "Cached rate: none")?,
    }

    let keys = db.list_keys()?;
    if keys.is_empty() {
        writeln!(writer, "No stored keys.")?;
        return Ok(());
    }
    writeln!(writer, "Stored keys:")?;
    for (key, updated_at) in keys {
        writeln!(writer, "- {key} (updated {updated_at})")?;
    }
    Ok(())
}
