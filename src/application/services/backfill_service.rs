//! Historical backfill over a date range in small concurrent batches.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use super::pipeline_service::DateProcessor;
use super::report_service::ResultReporter;
use crate::domain::repositories::ProgressRepository;
use crate::domain::{BusinessDayCalendar, Clock};
use crate::domain::entities::ProcessingResult;
use crate::utils::dates::{format_display_date, format_marker_date};

#[derive(Debug, Clone)]
pub struct BackfillSettings {
    /// First date of the historical range.
    pub epoch: NaiveDate,
    /// Dates processed concurrently per batch.
    pub batch_size: usize,
    /// Pause after each full batch.
    pub batch_pause: Duration,
}

impl BackfillSettings {
    pub fn new(epoch: NaiveDate) -> Self {
        Self {
            epoch,
            batch_size: 2,
            batch_pause: Duration::from_secs(10),
        }
    }
}

/// Counters reported at the end of a backfill run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackfillSummary {
    /// Business days handed to the pipeline.
    pub dispatched: usize,
    /// Results passed to the reporter.
    pub delivered: usize,
    /// Pipeline tasks that panicked or were cancelled.
    pub failed: usize,
    /// Weekend days and holidays skipped.
    pub skipped: usize,
}

/// Drives the pipeline from the resume point to the end date.
///
/// Dates are processed in batches; within a batch completion order is
/// arbitrary, but results are reported in date order.
pub struct BackfillService {
    processor: Arc<dyn DateProcessor>,
    reporter: Arc<dyn ResultReporter>,
    progress: Arc<dyn ProgressRepository>,
    calendar: Arc<BusinessDayCalendar>,
    clock: Arc<dyn Clock>,
    settings: BackfillSettings,
}

impl BackfillService {
    pub fn new(
        processor: Arc<dyn DateProcessor>,
        reporter: Arc<dyn ResultReporter>,
        progress: Arc<dyn ProgressRepository>,
        calendar: Arc<BusinessDayCalendar>,
        clock: Arc<dyn Clock>,
        settings: BackfillSettings,
    ) -> Self {
        Self {
            processor,
            reporter,
            progress,
            calendar,
            clock,
            settings,
        }
    }

    /// First date to process: the day after the stored marker when it is at
    /// or after the epoch, the epoch otherwise.
    pub async fn resume_point(&self) -> NaiveDate {
        let epoch = self.settings.epoch;
        let marker = match self.progress.load().await {
            Ok(marker) => marker,
            Err(e) => {
                error!(error = %e, "Failed to load progress marker, starting from epoch");
                None
            }
        };

        match marker.filter(|m| *m >= epoch).and_then(|m| m.succ_opt()) {
            Some(next) => {
                info!(from = %format_display_date(next), "Resuming historical processing");
                next
            }
            None => epoch,
        }
    }

    /// Pulls a future `end` back to the last business day on or before today.
    pub fn clamp_end(&self, end: NaiveDate) -> NaiveDate {
        let today = self.clock.today();
        if end <= today {
            return end;
        }
        let clamped = self.calendar.last_business_day_on_or_before(today);
        info!(end = %format_display_date(clamped), "Adjusted end date to last business day");
        clamped
    }

    /// Processes every business day from the resume point to `end` inclusive.
    pub async fn run(&self, end: NaiveDate) -> BackfillSummary {
        let start = self.resume_point().await;
        let end = self.clamp_end(end);
        let batch_size = self.settings.batch_size.max(1);
        let mut summary = BackfillSummary::default();

        info!(
            from = %format_display_date(start),
            to = %format_display_date(end),
            batch_size,
            "Processing historical editions"
        );

        let mut batch = Vec::with_capacity(batch_size);
        for date in start.iter_days().take_while(|d| *d <= end) {
            if !self.calendar.is_business_day(date) {
                info!(date = %format_marker_date(date), "Skipping weekend or holiday");
                summary.skipped += 1;
                continue;
            }

            batch.push(date);
            summary.dispatched += 1;
            if batch.len() >= batch_size {
                self.dispatch(std::mem::take(&mut batch), &mut summary).await;
                tokio::time::sleep(self.settings.batch_pause).await;
            }
        }

        if !batch.is_empty() {
            self.dispatch(batch, &mut summary).await;
        }

        info!(
            dispatched = summary.dispatched,
            delivered = summary.delivered,
            failed = summary.failed,
            skipped = summary.skipped,
            "Historical processing finished"
        );
        summary
    }

    /// Runs one batch concurrently and reports its results in date order.
    async fn dispatch(&self, batch: Vec<NaiveDate>, summary: &mut BackfillSummary) {
        let mut tasks = JoinSet::new();
        for date in batch {
            let processor = Arc::clone(&self.processor);
            tasks.spawn(async move { processor.process(date).await });
        }

        let mut results: Vec<ProcessingResult> = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!(error = %e, "Pipeline task failed, result dropped");
                    summary.failed += 1;
                }
            }
        }

        results.sort_by_key(|r| r.date);
        for result in &results {
            self.reporter.report(result).await;
            summary.delivered += 1;
        }
    }
}
