//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before any component
//! is built.
//!
//! ```bash
//! export TARGET_NAME="MARIA DA SILVA"
//! export TELEGRAM_BOT_TOKEN="123456:ABC-DEF"
//! export TELEGRAM_CHAT_ID="-1001234567890"
//! ```
//!
//! ## Required Variables
//!
//! - `TARGET_NAME` - Name searched for in each edition
//!
//! ## Optional Variables
//!
//! - `SEARCH_KEYWORD` - Keyword that must appear with the name (default: `Convocação`)
//! - `TELEGRAM_BOT_TOKEN` / `TELEGRAM_CHAT_ID` - Telegram delivery (log-only when either is missing)
//! - `HOLIDAYS` - Comma-separated `DD-MM-YYYY` list (default: built-in 2024-2025 list)
//! - `BACKFILL_START` / `BACKFILL_END` - Historical range (default: `01-11-2024` / `31-05-2025`)
//! - `WORK_DIR` - Directory for downloaded editions (default: `.`)
//! - `PROGRESS_FILE` - Progress marker file, relative to `WORK_DIR` (default: `last_processed_date.txt`)
//! - `DAILY_RUN_TIME` - Daily run time `HH:MM` (default: `06:00`)
//! - `MAX_RETRIES` - Rounds per date (default: 3, range: 1-10)
//! - `RETRY_BASE_DELAY_SECONDS` - Linear backoff unit (default: 20)
//! - `BATCH_SIZE` - Backfill batch size (default: 2, range: 1-16)
//! - `BATCH_PAUSE_SECONDS` - Pause after each backfill batch (default: 10)
//! - `ERROR_COOLDOWN_SECONDS` - Daily loop cooldown after a failure (default: 300)
//! - `REFERER_TIMEOUT_SECONDS` / `SEARCH_TIMEOUT_SECONDS` / `DOWNLOAD_TIMEOUT_SECONDS` (default: 15 / 30 / 60)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::BusinessDayCalendar;
use crate::domain::calendar::DEFAULT_HOLIDAYS;
use crate::infrastructure::extractor::DEFAULT_KEYWORD;
use crate::utils::dates::{format_marker_date, parse_marker_date};

const DEFAULT_BACKFILL_START: &str = "01-11-2024";
const DEFAULT_BACKFILL_END: &str = "31-05-2025";
const DEFAULT_PROGRESS_FILE: &str = "last_processed_date.txt";
const DAILY_RUN_TIME_FORMAT: &str = "%H:%M";

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub target_name: String,
    pub search_keyword: String,
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub holidays: Vec<NaiveDate>,
    pub backfill_start: NaiveDate,
    pub backfill_end: NaiveDate,
    pub work_dir: PathBuf,
    pub progress_file: PathBuf,
    pub daily_run_time: NaiveTime,
    pub max_retries: u32,
    pub retry_base_delay_seconds: u64,
    pub batch_size: usize,
    pub batch_pause_seconds: u64,
    pub error_cooldown_seconds: u64,

    // ── HTTP timeouts ───────────────────────────────────────────────────────
    pub referer_timeout_seconds: u64,
    pub search_timeout_seconds: u64,
    pub download_timeout_seconds: u64,

    pub log_level: String,
    pub log_format: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `TARGET_NAME` is missing or a date, time or holiday
    /// value does not parse.
    pub fn from_env() -> Result<Self> {
        let target_name = env::var("TARGET_NAME").context("TARGET_NAME must be set")?;
        let search_keyword =
            env::var("SEARCH_KEYWORD").unwrap_or_else(|_| DEFAULT_KEYWORD.to_string());

        let telegram_bot_token = non_empty_var("TELEGRAM_BOT_TOKEN");
        let telegram_chat_id = non_empty_var("TELEGRAM_CHAT_ID");

        let holidays = Self::load_holidays().context("Failed to load HOLIDAYS")?;

        let backfill_start = load_date("BACKFILL_START", DEFAULT_BACKFILL_START)?;
        let backfill_end = load_date("BACKFILL_END", DEFAULT_BACKFILL_END)?;

        let work_dir = PathBuf::from(env::var("WORK_DIR").unwrap_or_else(|_| ".".to_string()));
        let progress_file = work_dir.join(
            env::var("PROGRESS_FILE").unwrap_or_else(|_| DEFAULT_PROGRESS_FILE.to_string()),
        );

        let daily_run_time = match env::var("DAILY_RUN_TIME") {
            Ok(value) => NaiveTime::parse_from_str(value.trim(), DAILY_RUN_TIME_FORMAT)
                .with_context(|| format!("DAILY_RUN_TIME must be HH:MM, got '{value}'"))?,
            Err(_) => NaiveTime::from_hms_opt(6, 0, 0).context("invalid default run time")?,
        };

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        Ok(Self {
            target_name,
            search_keyword,
            telegram_bot_token,
            telegram_chat_id,
            holidays,
            backfill_start,
            backfill_end,
            work_dir,
            progress_file,
            daily_run_time,
            max_retries: parse_or("MAX_RETRIES", 3),
            retry_base_delay_seconds: parse_or("RETRY_BASE_DELAY_SECONDS", 20),
            batch_size: parse_or("BATCH_SIZE", 2),
            batch_pause_seconds: parse_or("BATCH_PAUSE_SECONDS", 10),
            error_cooldown_seconds: parse_or("ERROR_COOLDOWN_SECONDS", 300),
            referer_timeout_seconds: parse_or("REFERER_TIMEOUT_SECONDS", 15),
            search_timeout_seconds: parse_or("SEARCH_TIMEOUT_SECONDS", 30),
            download_timeout_seconds: parse_or("DOWNLOAD_TIMEOUT_SECONDS", 60),
            log_level,
            log_format,
        })
    }

    /// Loads the holiday list.
    ///
    /// Priority:
    /// 1. `HOLIDAYS` environment variable (comma-separated `DD-MM-YYYY`)
    /// 2. Built-in list
    fn load_holidays() -> Result<Vec<NaiveDate>> {
        let raw = env::var("HOLIDAYS").ok();
        let values: Vec<String> = match raw {
            Some(list) => list.split(',').map(str::to_string).collect(),
            None => DEFAULT_HOLIDAYS.iter().map(|s| s.to_string()).collect(),
        };

        values
            .iter()
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(|v| parse_marker_date(v).with_context(|| format!("invalid holiday '{v}'")))
            .collect()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `target_name` or `search_keyword` is blank
    /// - `max_retries` is outside 1-10 or `batch_size` outside 1-16
    /// - `backfill_start` is after `backfill_end`
    /// - any HTTP timeout is zero
    /// - `log_format` is not `text` or `json`
    pub fn validate(&self) -> Result<()> {
        if self.target_name.trim().is_empty() {
            anyhow::bail!("TARGET_NAME must not be empty");
        }

        if self.search_keyword.trim().is_empty() {
            anyhow::bail!("SEARCH_KEYWORD must not be empty");
        }

        if !(1..=10).contains(&self.max_retries) {
            anyhow::bail!(
                "MAX_RETRIES must be between 1 and 10, got {}",
                self.max_retries
            );
        }

        if !(1..=16).contains(&self.batch_size) {
            anyhow::bail!(
                "BATCH_SIZE must be between 1 and 16, got {}",
                self.batch_size
            );
        }

        if self.backfill_start > self.backfill_end {
            anyhow::bail!(
                "BACKFILL_START ({}) must not be after BACKFILL_END ({})",
                format_marker_date(self.backfill_start),
                format_marker_date(self.backfill_end)
            );
        }

        if self.referer_timeout_seconds == 0
            || self.search_timeout_seconds == 0
            || self.download_timeout_seconds == 0
        {
            anyhow::bail!("HTTP timeouts must be greater than 0");
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        Ok(())
    }

    /// Returns whether reports go to Telegram (both credentials present).
    pub fn is_telegram_enabled(&self) -> bool {
        self.telegram_bot_token.is_some() && self.telegram_chat_id.is_some()
    }

    pub fn calendar(&self) -> BusinessDayCalendar {
        BusinessDayCalendar::new(self.holidays.iter().copied())
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_secs(self.retry_base_delay_seconds)
    }

    pub fn batch_pause(&self) -> Duration {
        Duration::from_secs(self.batch_pause_seconds)
    }

    pub fn error_cooldown(&self) -> Duration {
        Duration::from_secs(self.error_cooldown_seconds)
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Target name: {}", self.target_name);
        tracing::info!("  Keyword: {}", self.search_keyword);

        match (&self.telegram_bot_token, &self.telegram_chat_id) {
            (Some(token), Some(chat_id)) => {
                tracing::info!("  Telegram: {} -> chat {} (enabled)", mask_token(token), chat_id)
            }
            (None, None) => tracing::info!("  Telegram: disabled (log-only)"),
            _ => tracing::warn!(
                "  Telegram: disabled, TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID must both be set"
            ),
        }

        tracing::info!(
            "  Backfill range: {} to {}",
            format_marker_date(self.backfill_start),
            format_marker_date(self.backfill_end)
        );
        tracing::info!("  Holidays: {}", self.holidays.len());
        tracing::info!("  Work dir: {}", self.work_dir.display());
        tracing::info!("  Progress file: {}", self.progress_file.display());
        tracing::info!("  Daily run time: {}", self.daily_run_time.format("%H:%M"));
        tracing::info!(
            "  Retries: {} (base delay {}s)",
            self.max_retries,
            self.retry_base_delay_seconds
        );
        tracing::info!(
            "  Batch size: {} (pause {}s)",
            self.batch_size,
            self.batch_pause_seconds
        );
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn load_date(name: &str, default: &str) -> Result<NaiveDate> {
    let value = env::var(name).unwrap_or_else(|_| default.to_string());
    parse_marker_date(&value).with_context(|| format!("{name} must be DD-MM-YYYY, got '{value}'"))
}

/// Masks a bot token for logging.
///
/// Keeps the numeric bot id before `:` and hides the secret part:
/// - `123456:ABC-DEF` → `123456:***`
/// - `opaque` → `***`
fn mask_token(token: &str) -> String {
    match token.split_once(':') {
        Some((bot_id, _)) => format!("{bot_id}:***"),
        None => "***".to_string(),
    }
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if required variables are missing or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
