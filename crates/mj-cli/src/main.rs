use std::io::Write;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mj_cli::commands::{add, calc, edit, exchange, list, rate, remove, show, status};
use mj_cli::fx::HttpFetcher;
use mj_cli::{App, Cli, Commands, Config};

fn dispatch<W: Write>(writer: &mut W, app: &mut App, command: &Commands) -> Result<()> {
    match command {
        Commands::Add(args) => add::run(writer, app, args),
        Commands::Edit(args) => edit::run(writer, app, args),
        Commands::Rm(args) => remove::run(writer, app, args),
        Commands::Clear(args) => remove::clear(writer, app, args),
        Commands::Show(args) => {
            let fetcher = HttpFetcher::new(app.config.exchange_rate_url.as_str());
            show::run(writer, app, args, &fetcher, Utc::now())
        }
        Commands::List(args) => list::run(writer, app, args),
        Commands::Rate(args) => rate::run(writer, app, args),
        Commands::Calc(args) => calc::run(writer, app, args),
        Commands::Fx(args) => {
            let fetcher = HttpFetcher::new(app.config.exchange_rate_url.as_str());
            exchange::run(writer, app, args, &fetcher, Utc::now())
        }
        Commands::Status => status::run(writer, app),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let mut app = App::open(config);
    let mut stdout = std::io::stdout().lock();
    let result = dispatch(&mut stdout, &mut app, command);

    for warning in app.take_warnings() {
        eprintln!("warning: {warning}");
    }
    result
}
