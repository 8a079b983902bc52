//! Process lifecycle: builds the application context and drives the selected
//! mode until it finishes or Ctrl-C arrives.

use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;

use crate::config::Config;
use crate::state::AppState;
use crate::utils::dates::format_display_date;

/// What the process should do after startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Backfill up to the configured end while it is still ahead, then run daily.
    Run,
    /// Backfill only, up to `end` (defaults to the configured end).
    Backfill { end: Option<NaiveDate> },
    /// Daily loop only.
    Daily,
    /// Process and report a single date.
    Check { date: NaiveDate },
}

/// Runs the given mode with the given configuration.
///
/// # Errors
///
/// Returns an error if the application context cannot be built.
pub async fn run(config: Config, mode: Mode) -> Result<()> {
    let state = AppState::from_config(&config)?;
    tracing::info!(?mode, "Starting");

    match mode {
        Mode::Run => {
            let today = state.clock.today();
            if today <= config.backfill_end {
                if !until_shutdown(backfill(&state, config.backfill_end)).await {
                    return Ok(());
                }
            } else {
                tracing::info!(
                    end = %format_display_date(config.backfill_end),
                    "Backfill horizon already passed, going straight to daily mode"
                );
            }
            until_shutdown(Arc::new(state.daily_scheduler()).run_forever()).await;
        }
        Mode::Backfill { end } => {
            until_shutdown(backfill(&state, end.unwrap_or(config.backfill_end))).await;
        }
        Mode::Daily => {
            until_shutdown(Arc::new(state.daily_scheduler()).run_forever()).await;
        }
        Mode::Check { date } => {
            let work = async {
                let result = state.processor.process(date).await;
                tracing::info!(
                    date = %format_display_date(date),
                    entries = result.entries.len(),
                    "Check finished"
                );
                state.reporter.report(&result).await;
            };
            until_shutdown(work).await;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn backfill(state: &AppState, end: NaiveDate) {
    let summary = state.backfill_service().run(end).await;
    tracing::info!(
        dispatched = summary.dispatched,
        delivered = summary.delivered,
        failed = summary.failed,
        skipped = summary.skipped,
        "Backfill finished"
    );
}

/// Drives `work` to completion unless Ctrl-C arrives first.
///
/// Returns false when interrupted. Dropping `work` cancels any in-flight
/// pipeline; downloaded artifacts are removed by their handles.
async fn until_shutdown<F: Future<Output = ()>>(work: F) -> bool {
    tokio::select! {
        _ = work => true,
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received");
            false
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
