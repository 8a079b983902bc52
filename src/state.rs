//! Application context built once at startup.
//!
//! Every component is constructed here from [`Config`] and shared through
//! `Arc`s; there are no global singletons.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::services::{
    BackfillService, BackfillSettings, DailyScheduler, DailySettings, DatePipeline, DateProcessor,
    PipelineSettings, ReportService, ReportSettings, ResultReporter,
};
use crate::config::Config;
use crate::domain::repositories::ProgressRepository;
use crate::domain::{BusinessDayCalendar, Clock, SystemClock};
use crate::infrastructure::extractor::PdfEntryExtractor;
use crate::infrastructure::fetcher::HttpFetcher;
use crate::infrastructure::http::build_client;
use crate::infrastructure::locator::{DocumentLocator, GazetteLocator, LocatorSettings};
use crate::infrastructure::notifier::{LogNotifier, Notifier, TelegramNotifier};
use crate::infrastructure::persistence::FileProgressRepository;

#[derive(Clone)]
pub struct AppState {
    pub calendar: Arc<BusinessDayCalendar>,
    pub clock: Arc<dyn Clock>,
    pub locator: Arc<dyn DocumentLocator>,
    pub progress: Arc<dyn ProgressRepository>,
    pub processor: Arc<dyn DateProcessor>,
    pub reporter: Arc<dyn ResultReporter>,
    backfill_settings: BackfillSettings,
    daily_settings: DailySettings,
}

impl AppState {
    /// Wires every component from the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the work
    /// directory cannot be created.
    pub fn from_config(config: &Config) -> Result<Self> {
        std::fs::create_dir_all(&config.work_dir).with_context(|| {
            format!("Failed to create work dir {}", config.work_dir.display())
        })?;

        let client = build_client().context("Failed to build HTTP client")?;

        let calendar = Arc::new(config.calendar());
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let locator: Arc<dyn DocumentLocator> = Arc::new(GazetteLocator::new(LocatorSettings {
            referer_timeout: Duration::from_secs(config.referer_timeout_seconds),
            search_timeout: Duration::from_secs(config.search_timeout_seconds),
            ..LocatorSettings::default()
        }));

        let fetcher = Arc::new(HttpFetcher::new(
            client.clone(),
            &config.work_dir,
            Duration::from_secs(config.download_timeout_seconds),
        ));

        let progress: Arc<dyn ProgressRepository> =
            Arc::new(FileProgressRepository::new(&config.progress_file));

        let notifier: Arc<dyn Notifier> =
            match (&config.telegram_bot_token, &config.telegram_chat_id) {
                (Some(token), Some(chat_id)) => {
                    tracing::info!("Notifications enabled (Telegram)");
                    Arc::new(TelegramNotifier::new(client, token, chat_id))
                }
                _ => {
                    tracing::info!("Notifications disabled (LogNotifier)");
                    Arc::new(LogNotifier::new())
                }
            };

        let pipeline_settings = PipelineSettings {
            keyword: config.search_keyword.clone(),
            max_retries: config.max_retries,
            retry_base_delay: config.retry_base_delay(),
            ..PipelineSettings::new(&config.target_name)
        };

        let processor: Arc<dyn DateProcessor> = Arc::new(DatePipeline::new(
            locator.clone(),
            fetcher,
            Arc::new(PdfEntryExtractor::new()),
            progress.clone(),
            clock.clone(),
            pipeline_settings,
        ));

        let reporter: Arc<dyn ResultReporter> = Arc::new(ReportService::new(
            notifier,
            ReportSettings::new(&config.target_name),
        ));

        Ok(Self {
            calendar,
            clock,
            locator,
            progress,
            processor,
            reporter,
            backfill_settings: BackfillSettings {
                batch_size: config.batch_size,
                batch_pause: config.batch_pause(),
                ..BackfillSettings::new(config.backfill_start)
            },
            daily_settings: DailySettings {
                run_time: config.daily_run_time,
                error_cooldown: config.error_cooldown(),
            },
        })
    }

    pub fn backfill_service(&self) -> BackfillService {
        BackfillService::new(
            self.processor.clone(),
            self.reporter.clone(),
            self.progress.clone(),
            self.calendar.clone(),
            self.clock.clone(),
            self.backfill_settings.clone(),
        )
    }

    pub fn daily_scheduler(&self) -> DailyScheduler {
        DailyScheduler::new(
            self.processor.clone(),
            self.reporter.clone(),
            self.calendar.clone(),
            self.clock.clone(),
            self.daily_settings.clone(),
        )
    }
}
