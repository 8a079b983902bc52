//! Daily schedule: process today's edition once per business day.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDateTime, NaiveTime};
use tracing::{error, info, warn};

use super::pipeline_service::DateProcessor;
use super::report_service::ResultReporter;
use crate::domain::{BusinessDayCalendar, Clock};
use crate::utils::dates::format_marker_date;

#[derive(Debug, Clone)]
pub struct DailySettings {
    /// Wall-clock time of the daily run.
    pub run_time: NaiveTime,
    /// Wait after a failed iteration before the loop continues.
    pub error_cooldown: Duration,
}

impl Default for DailySettings {
    fn default() -> Self {
        Self {
            run_time: NaiveTime::from_hms_opt(6, 0, 0).unwrap_or_default(),
            error_cooldown: Duration::from_secs(300),
        }
    }
}

/// Runs the pipeline for the current date every business day.
pub struct DailyScheduler {
    processor: Arc<dyn DateProcessor>,
    reporter: Arc<dyn ResultReporter>,
    calendar: Arc<BusinessDayCalendar>,
    clock: Arc<dyn Clock>,
    settings: DailySettings,
}

impl DailyScheduler {
    pub fn new(
        processor: Arc<dyn DateProcessor>,
        reporter: Arc<dyn ResultReporter>,
        calendar: Arc<BusinessDayCalendar>,
        clock: Arc<dyn Clock>,
        settings: DailySettings,
    ) -> Self {
        Self {
            processor,
            reporter,
            calendar,
            clock,
            settings,
        }
    }

    /// Processes and reports today when it is a business day.
    ///
    /// Returns whether the pipeline ran.
    pub async fn run_once(&self) -> bool {
        let today = self.clock.today();
        if !self.calendar.is_business_day(today) {
            info!(date = %format_marker_date(today), "Skipping weekend or holiday");
            return false;
        }

        let result = self.processor.process(today).await;
        self.reporter.report(&result).await;
        true
    }

    /// Tomorrow (relative to `now`) at the configured run time.
    pub fn next_run_after(&self, now: NaiveDateTime) -> NaiveDateTime {
        let tomorrow = now.date().succ_opt().unwrap_or(now.date());
        tomorrow.and_time(self.settings.run_time)
    }

    /// Loops forever: run, then sleep until the next run time.
    ///
    /// Each iteration runs on its own task, so a panic inside the pipeline is
    /// contained, logged and followed by the error cooldown. Dropping the
    /// returned future (e.g. on shutdown) cancels the wait.
    pub async fn run_forever(self: Arc<Self>) {
        loop {
            let started_at = self.clock.now();
            let this = Arc::clone(&self);

            if let Err(e) = tokio::spawn(async move { this.run_once().await }).await {
                error!(error = %e, "Daily iteration failed");
                tokio::time::sleep(self.settings.error_cooldown).await;
                continue;
            }

            let next_run = self.next_run_after(started_at);
            match (next_run - self.clock.now()).to_std() {
                Ok(wait) if !wait.is_zero() => {
                    info!(next_run = %next_run.format("%d/%m/%Y %H:%M:%S"), "Waiting for next run");
                    tokio::time::sleep(wait).await;
                }
                _ => warn!("Non-positive wait, running immediately"),
            }
        }
    }
}
