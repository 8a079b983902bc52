//! CLI administration tool for dou-watcher.
//!
//! Inspects and edits the progress marker, resolves edition URLs by hand and
//! checks configuration without starting the pipeline.
//!
//! # Usage
//!
//! ```bash
//! # Show the stored progress marker
//! cargo run --bin admin -- progress show
//!
//! # Move the marker (the next backfill resumes the day after)
//! cargo run --bin admin -- progress set 31-12-2024
//!
//! # Remove the marker (the next backfill starts at BACKFILL_START)
//! cargo run --bin admin -- progress clear
//!
//! # Resolve the Section 3 edition URL for a date
//! cargo run --bin admin -- locate 05-11-2024
//!
//! # Validate configuration
//! cargo run --bin admin -- config check
//! ```
//!
//! # Environment Variables
//!
//! Same as the main binary; `TARGET_NAME` is required.

use dou_watcher::config::{self, Config};
use dou_watcher::domain::repositories::ProgressRepository;
use dou_watcher::infrastructure::locator::{DocumentLocator, GazetteLocator, LocatorSettings};
use dou_watcher::infrastructure::persistence::FileProgressRepository;
use dou_watcher::utils::dates::{format_display_date, format_marker_date, parse_marker_date};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use std::time::Duration;

/// CLI tool for managing dou-watcher.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage the progress marker
    Progress {
        #[command(subcommand)]
        action: ProgressAction,
    },

    /// Resolve the edition URL for a date (DD-MM-YYYY)
    Locate {
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
    },

    /// Configuration operations
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Progress marker subcommands.
#[derive(Subcommand)]
enum ProgressAction {
    /// Show the stored marker
    Show,

    /// Overwrite the marker
    Set {
        /// Last processed date (DD-MM-YYYY)
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
    },

    /// Delete the marker
    Clear {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Configuration subcommands.
#[derive(Subcommand)]
enum ConfigAction {
    /// Load and validate configuration
    Check,
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    parse_marker_date(value).map_err(|e| format!("expected DD-MM-YYYY: {e}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Progress { action } => {
            let config = config::load_from_env().context("Invalid configuration")?;
            handle_progress_action(action, &config).await?
        }
        Commands::Locate { date } => {
            let config = config::load_from_env().context("Invalid configuration")?;
            locate(date, &config).await?
        }
        Commands::Config { action } => match action {
            ConfigAction::Check => check_config()?,
        },
    }

    Ok(())
}

/// Dispatches progress marker commands.
async fn handle_progress_action(action: ProgressAction, config: &Config) -> Result<()> {
    let repo = FileProgressRepository::new(&config.progress_file);

    match action {
        ProgressAction::Show => show_progress(&repo, config).await?,
        ProgressAction::Set { date } => set_progress(&repo, date).await?,
        ProgressAction::Clear { yes } => clear_progress(&repo, yes).await?,
    }

    Ok(())
}

async fn show_progress(repo: &FileProgressRepository, config: &Config) -> Result<()> {
    println!("{}", "📌 Progress Marker".bright_blue().bold());
    println!();
    println!("  File: {}", repo.path().display().to_string().bright_black());

    let marker = repo
        .load()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read marker: {}", e))?;

    match marker {
        Some(date) => {
            println!("  Last processed: {}", format_display_date(date).cyan());
            if date >= config.backfill_start
                && let Some(next) = date.succ_opt()
            {
                println!(
                    "  Next backfill:  {}",
                    format_display_date(next).bright_white()
                );
            } else {
                println!(
                    "  Next backfill:  {} {}",
                    format_display_date(config.backfill_start).bright_white(),
                    "(marker before BACKFILL_START)".yellow()
                );
            }
        }
        None => {
            println!("  {}", "No marker stored".yellow());
            println!(
                "  Next backfill:  {}",
                format_display_date(config.backfill_start).bright_white()
            );
        }
    }
    println!();

    Ok(())
}

async fn set_progress(repo: &FileProgressRepository, date: NaiveDate) -> Result<()> {
    repo.save(date)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to write marker: {}", e))?;

    println!(
        "{} {}",
        "✅ Marker set to".green().bold(),
        format_marker_date(date).cyan()
    );

    Ok(())
}

/// Deletes the marker after confirmation (default: No).
async fn clear_progress(repo: &FileProgressRepository, skip_confirm: bool) -> Result<()> {
    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete the progress marker? The next backfill restarts from the epoch")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    repo.clear()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete marker: {}", e))?;

    println!("{}", "✅ Marker cleared".green().bold());

    Ok(())
}

async fn locate(date: NaiveDate, config: &Config) -> Result<()> {
    println!(
        "{} {}",
        "🔎 Locating edition for".bright_blue().bold(),
        format_display_date(date).cyan()
    );
    println!();

    let locator = GazetteLocator::new(LocatorSettings {
        referer_timeout: Duration::from_secs(config.referer_timeout_seconds),
        search_timeout: Duration::from_secs(config.search_timeout_seconds),
        ..LocatorSettings::default()
    });

    match locator.locate(date).await {
        Some(reference) => println!("  {}", reference.as_str().bright_yellow()),
        None => println!("  {}", "No Section 3 edition found".yellow()),
    }
    println!();

    Ok(())
}

/// Loads configuration and prints the outcome without exposing secrets.
fn check_config() -> Result<()> {
    println!("{}", "⚙️  Configuration Check".bright_blue().bold());
    println!();

    match config::load_from_env() {
        Ok(config) => {
            println!("  Target name:   {}", config.target_name.cyan());
            println!("  Keyword:       {}", config.search_keyword.cyan());
            println!(
                "  Backfill:      {} → {}",
                format_marker_date(config.backfill_start),
                format_marker_date(config.backfill_end)
            );
            println!("  Holidays:      {}", config.holidays.len());
            println!("  Progress file: {}", config.progress_file.display());
            let telegram = if config.is_telegram_enabled() {
                "ENABLED".green()
            } else {
                "DISABLED (log-only)".yellow()
            };
            println!("  Telegram:      {}", telegram);
            println!();
            println!("{}", "✅ Configuration is valid".green().bold());
        }
        Err(e) => {
            println!("{} {:#}", "❌ Invalid configuration:".red().bold(), e);
            println!();
            anyhow::bail!("configuration check failed");
        }
    }
    println!();

    Ok(())
}
