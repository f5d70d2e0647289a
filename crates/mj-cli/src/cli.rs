//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::add::AddArgs;
use crate::commands::calc::CalcArgs;
use crate::commands::edit::EditArgs;
use crate::commands::exchange::FxArgs;
use crate::commands::list::ListArgs;
use crate::commands::rate::RateArgs;
use crate::commands::remove::{ClearArgs, RemoveArgs};
use crate::commands::show::ShowArgs;

/// Personal earnings tracker for side jobs.
///
/// Records daily or hourly work, totals it per month and optionally shows the
/// total in a second currency.
#[derive(Debug, Parser)]
#[command(name = "mj", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Record a new entry.
    Add(AddArgs),

    /// Change an existing entry.
    Edit(EditArgs),

    /// Delete an entry.
    Rm(RemoveArgs),

    /// Delete every entry.
    Clear(ClearArgs),

    /// Show a month: total, daily chart and entries.
    Show(ShowArgs),

    /// List every entry, newest first.
    List(ListArgs),

    /// Show or set the default hourly rate.
    Rate(RateArgs),

    /// Preview hours and pay for a shift without saving it.
    Calc(CalcArgs),

    /// Show the exchange rate used for the converted total.
    Fx(FxArgs),

    /// Show storage and settings status.
    Status,
}
