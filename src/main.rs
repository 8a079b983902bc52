//! `dou-watcher` entry point.
//!
//! ```bash
//! # Backfill while the horizon is ahead, then run daily (default)
//! cargo run
//!
//! # Backfill up to a given date and exit
//! cargo run -- backfill --end 31-01-2025
//!
//! # Process and report one date
//! cargo run -- check --date 05-11-2024
//! ```

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dou_watcher::config::{self, Config};
use dou_watcher::runner::{self, Mode};
use dou_watcher::utils::dates::parse_marker_date;

/// Watches the DOU Section 3 for a name and reports matches.
#[derive(Parser)]
#[command(name = "dou-watcher")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Backfill while the configured horizon is ahead, then run daily
    Run,

    /// Process the historical range and exit
    Backfill {
        /// Last date to process (DD-MM-YYYY); defaults to BACKFILL_END
        #[arg(long, value_parser = parse_date)]
        end: Option<NaiveDate>,
    },

    /// Run the daily loop only
    Daily,

    /// Process and report a single date
    Check {
        /// Date to process (DD-MM-YYYY)
        #[arg(long, value_parser = parse_date)]
        date: NaiveDate,
    },
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    parse_marker_date(value).map_err(|e| format!("expected DD-MM-YYYY: {e}"))
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    if config.log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env().context("Invalid configuration")?;
    init_tracing(&config);
    config.print_summary();

    let mode = match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => Mode::Run,
        Commands::Backfill { end } => Mode::Backfill { end },
        Commands::Daily => Mode::Daily,
        Commands::Check { date } => Mode::Check { date },
    };

    runner::run(config, mode).await
}
