//! Per-date ingestion pipeline: locate → fetch → extract, with bounded retries.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{error, info, warn};

use crate::domain::Clock;
use crate::domain::entities::{FetchedArtifact, ProcessingResult};
use crate::domain::repositories::ProgressRepository;
use crate::infrastructure::extractor::{DEFAULT_KEYWORD, EntryExtractor};
use crate::infrastructure::fetcher::DocumentFetcher;
use crate::infrastructure::locator::DocumentLocator;
use crate::utils::dates::format_marker_date;

/// Anything that turns a date into a [`ProcessingResult`].
///
/// The backfill and the daily loop depend on this trait rather than on
/// [`DatePipeline`] directly.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DateProcessor: Send + Sync {
    /// Processes `date`. Never fails: every outcome is a result.
    async fn process(&self, date: NaiveDate) -> ProcessingResult;
}

/// Search target and retry policy of the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub target_name: String,
    pub keyword: String,
    /// Rounds attempted per date.
    pub max_retries: u32,
    /// Wait after failed round `n` is `retry_base_delay * n`.
    pub retry_base_delay: Duration,
}

impl PipelineSettings {
    pub fn new(target_name: impl Into<String>) -> Self {
        Self {
            target_name: target_name.into(),
            keyword: DEFAULT_KEYWORD.to_string(),
            max_retries: 3,
            retry_base_delay: Duration::from_secs(20),
        }
    }

    /// Delay after the failed round `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.retry_base_delay * attempt
    }
}

/// Composes locator, fetcher and extractor for one date.
///
/// The downloaded artifact never outlives [`DatePipeline::process`]: it is
/// owned by a [`FetchedArtifact`] handle that deletes the file when dropped.
pub struct DatePipeline {
    locator: Arc<dyn DocumentLocator>,
    fetcher: Arc<dyn DocumentFetcher>,
    extractor: Arc<dyn EntryExtractor>,
    progress: Arc<dyn ProgressRepository>,
    clock: Arc<dyn Clock>,
    settings: PipelineSettings,
}

impl DatePipeline {
    pub fn new(
        locator: Arc<dyn DocumentLocator>,
        fetcher: Arc<dyn DocumentFetcher>,
        extractor: Arc<dyn EntryExtractor>,
        progress: Arc<dyn ProgressRepository>,
        clock: Arc<dyn Clock>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            locator,
            fetcher,
            extractor,
            progress,
            clock,
            settings,
        }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Runs the date through up to `max_retries` rounds.
    ///
    /// # Behaviour
    ///
    /// - Dates after today return an empty result without any network call.
    /// - The first round that yields a valid document wins; its entries are
    ///   extracted and the progress marker is saved.
    /// - Failed rounds wait 20 s, 40 s, 60 s, … before the next one.
    /// - When every round fails the marker is saved anyway, so a missing
    ///   edition does not block later resumption.
    pub async fn process(&self, date: NaiveDate) -> ProcessingResult {
        let date_str = format_marker_date(date);
        info!(date = %date_str, "Processing DOU");

        if date > self.clock.today() {
            warn!(date = %date_str, "Date is in the future, skipping");
            return ProcessingResult::empty(date);
        }

        let max_retries = self.settings.max_retries;
        for attempt in 1..=max_retries {
            if let Some(artifact) = self.attempt(date).await {
                let result = self.read_entries(artifact).await;
                self.save_progress(date).await;
                return result;
            }

            let delay = self.settings.backoff(attempt);
            warn!(
                date = %date_str,
                attempt,
                max_retries,
                delay_secs = delay.as_secs(),
                "Attempt failed"
            );
            tokio::time::sleep(delay).await;
        }

        error!(date = %date_str, max_retries, "Giving up after all attempts");
        self.save_progress(date).await;
        ProcessingResult::empty(date)
    }

    /// One locate + fetch round. `None` means the round failed.
    async fn attempt(&self, date: NaiveDate) -> Option<FetchedArtifact> {
        let reference = self.locator.locate(date).await?;
        match self.fetcher.fetch(&reference, date).await {
            Ok(artifact) => Some(artifact),
            Err(e) => {
                warn!(date = %format_marker_date(date), url = %reference, error = %e, "Fetch failed");
                None
            }
        }
    }

    /// Extracts entries and consumes the artifact. Extraction failures
    /// degrade to an empty entry list.
    async fn read_entries(&self, artifact: FetchedArtifact) -> ProcessingResult {
        let date = artifact.date();
        let entries = match self
            .extractor
            .extract(
                artifact.path(),
                &self.settings.target_name,
                &self.settings.keyword,
            )
            .await
        {
            Ok(entries) => entries,
            Err(e) => {
                error!(date = %format_marker_date(date), error = %e, "Extraction failed");
                Vec::new()
            }
        };

        let document = if entries.is_empty() {
            None
        } else {
            match artifact.read_bytes().await {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    warn!(path = %artifact.path().display(), error = %e, "Could not keep PDF for attachment");
                    None
                }
            }
        };

        let path = artifact.path().to_path_buf();
        drop(artifact);

        ProcessingResult {
            entries,
            date,
            artifact: Some(path),
            document,
        }
    }

    async fn save_progress(&self, date: NaiveDate) {
        if let Err(e) = self.progress.save(date).await {
            error!(date = %format_marker_date(date), error = %e, "Failed to save progress marker");
        }
    }
}

#[async_trait]
impl DateProcessor for DatePipeline {
    async fn process(&self, date: NaiveDate) -> ProcessingResult {
        DatePipeline::process(self, date).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FixedClock;
    use crate::domain::entities::{EditionReference, Entry};
    use crate::domain::repositories::MockProgressRepository;
    use crate::error::{ExtractError, FetchError};
    use crate::infrastructure::extractor::MockEntryExtractor;
    use crate::infrastructure::fetcher::MockDocumentFetcher;
    use crate::infrastructure::locator::MockDocumentLocator;
    use std::path::{Path, PathBuf};
    use url::Url;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn reference() -> EditionReference {
        EditionReference::new(Url::parse("https://pesquisa.in.gov.br/imprensa/core/edition.pdf").unwrap())
    }

    fn today() -> NaiveDate {
        date(2024, 11, 8)
    }

    /// Fetcher mock that writes a placeholder file for each call.
    fn writing_fetcher(dir: &Path, times: usize) -> MockDocumentFetcher {
        let dir = dir.to_path_buf();
        let mut fetcher = MockDocumentFetcher::new();
        fetcher.expect_fetch().times(times).returning(move |_, d| {
            let path = dir.join(format!("dou_latest_{}.pdf", d.format("%d%m%Y")));
            std::fs::write(&path, b"%PDF-1.5 placeholder").unwrap();
            Ok(FetchedArtifact::new(path, d))
        });
        fetcher
    }

    fn saving_progress(expected: NaiveDate) -> MockProgressRepository {
        let mut progress = MockProgressRepository::new();
        progress
            .expect_save()
            .withf(move |d| *d == expected)
            .times(1)
            .returning(|_| Ok(()));
        progress
    }

    fn pipeline(
        locator: MockDocumentLocator,
        fetcher: MockDocumentFetcher,
        extractor: MockEntryExtractor,
        progress: MockProgressRepository,
    ) -> DatePipeline {
        DatePipeline::new(
            Arc::new(locator),
            Arc::new(fetcher),
            Arc::new(extractor),
            Arc::new(progress),
            Arc::new(FixedClock::at_noon(today())),
            PipelineSettings::new("Maria Souza"),
        )
    }

    #[tokio::test]
    async fn test_future_date_short_circuits() {
        let mut locator = MockDocumentLocator::new();
        locator.expect_locate().never();
        let mut fetcher = MockDocumentFetcher::new();
        fetcher.expect_fetch().never();
        let mut progress = MockProgressRepository::new();
        progress.expect_save().never();

        let pipeline = pipeline(locator, fetcher, MockEntryExtractor::new(), progress);
        let result = pipeline.process(date(2024, 11, 9)).await;

        assert_eq!(result, ProcessingResult::empty(date(2024, 11, 9)));
    }

    #[tokio::test]
    async fn test_today_is_not_future() {
        let dir = tempfile::tempdir().unwrap();
        let mut locator = MockDocumentLocator::new();
        locator.expect_locate().times(1).returning(|_| Some(reference()));
        let mut extractor = MockEntryExtractor::new();
        extractor.expect_extract().times(1).returning(|_, _, _| Ok(vec![]));

        let pipeline = pipeline(
            locator,
            writing_fetcher(dir.path(), 1),
            extractor,
            saving_progress(today()),
        );
        let result = pipeline.process(today()).await;

        assert!(result.entries.is_empty());
        assert!(result.artifact.is_some());
    }

    #[tokio::test]
    async fn test_success_returns_entries_and_removes_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let target = date(2024, 11, 4);

        let mut locator = MockDocumentLocator::new();
        locator.expect_locate().times(1).returning(|_| Some(reference()));
        let mut extractor = MockEntryExtractor::new();
        extractor
            .expect_extract()
            .withf(|path, name, keyword| {
                path.exists() && name == "Maria Souza" && keyword == "Convocação"
            })
            .times(1)
            .returning(|_, _, _| {
                Ok(vec![
                    Entry::new(3, "Convocação de MARIA SOUZA - item 1"),
                    Entry::new(3, "Convocação de MARIA SOUZA - item 2"),
                ])
            });

        let pipeline = pipeline(
            locator,
            writing_fetcher(dir.path(), 1),
            extractor,
            saving_progress(target),
        );
        let result = pipeline.process(target).await;

        assert_eq!(result.entries.len(), 2);
        assert!(result.entries.iter().all(|e| e.page == 3));
        assert_eq!(
            result.document.as_deref(),
            Some(&b"%PDF-1.5 placeholder"[..])
        );
        let artifact = result.artifact.unwrap();
        assert_eq!(artifact, dir.path().join("dou_latest_04112024.pdf"));
        assert!(!artifact.exists());
    }

    #[tokio::test]
    async fn test_no_entries_means_no_document_kept() {
        let dir = tempfile::tempdir().unwrap();
        let target = date(2024, 11, 4);
        let mut locator = MockDocumentLocator::new();
        locator.expect_locate().returning(|_| Some(reference()));
        let mut extractor = MockEntryExtractor::new();
        extractor.expect_extract().returning(|_, _, _| Ok(vec![]));

        let pipeline = pipeline(
            locator,
            writing_fetcher(dir.path(), 1),
            extractor,
            saving_progress(target),
        );
        let result = pipeline.process(target).await;

        assert!(result.document.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_found_exhausts_retries_with_linear_backoff() {
        let target = date(2024, 11, 4);
        let mut locator = MockDocumentLocator::new();
        locator.expect_locate().times(3).returning(|_| None);
        let mut fetcher = MockDocumentFetcher::new();
        fetcher.expect_fetch().never();

        let pipeline = pipeline(
            locator,
            fetcher,
            MockEntryExtractor::new(),
            saving_progress(target),
        );

        let started = tokio::time::Instant::now();
        let result = pipeline.process(target).await;

        assert_eq!(started.elapsed(), Duration::from_secs(20 + 40 + 60));
        assert_eq!(result, ProcessingResult::empty(target));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_failure_is_retried_then_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let target = date(2024, 11, 4);
        let dir_path = dir.path().to_path_buf();

        let mut locator = MockDocumentLocator::new();
        locator.expect_locate().times(2).returning(|_| Some(reference()));

        let mut fetcher = MockDocumentFetcher::new();
        let mut seq = mockall::Sequence::new();
        fetcher
            .expect_fetch()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|r, _| {
                Err(FetchError::ContentType {
                    url: r.to_string(),
                    content_type: "text/html".to_string(),
                })
            });
        fetcher
            .expect_fetch()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_, d| {
                let path = dir_path.join("doc.pdf");
                std::fs::write(&path, b"%PDF").unwrap();
                Ok(FetchedArtifact::new(path, d))
            });

        let mut extractor = MockEntryExtractor::new();
        extractor
            .expect_extract()
            .times(1)
            .returning(|_, _, _| Ok(vec![Entry::new(1, "Convocação Maria Souza")]));

        let pipeline = pipeline(locator, fetcher, extractor, saving_progress(target));

        let started = tokio::time::Instant::now();
        let result = pipeline.process(target).await;

        assert_eq!(started.elapsed(), Duration::from_secs(20));
        assert_eq!(result.entries.len(), 1);
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[tokio::test]
    async fn test_extraction_error_degrades_to_empty_without_retry() {
        let dir = tempfile::tempdir().unwrap();
        let target = date(2024, 11, 4);
        let mut locator = MockDocumentLocator::new();
        locator.expect_locate().times(1).returning(|_| Some(reference()));
        let mut extractor = MockEntryExtractor::new();
        extractor.expect_extract().times(1).returning(|path, _, _| {
            Err(ExtractError::Open {
                path: PathBuf::from(path),
                reason: "corrupt xref".to_string(),
            })
        });

        let pipeline = pipeline(
            locator,
            writing_fetcher(dir.path(), 1),
            extractor,
            saving_progress(target),
        );
        let result = pipeline.process(target).await;

        assert!(result.entries.is_empty());
        assert!(!dir.path().join("dou_latest_04112024.pdf").exists());
    }

    #[tokio::test]
    async fn test_progress_save_failure_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut locator = MockDocumentLocator::new();
        locator.expect_locate().returning(|_| Some(reference()));
        let mut extractor = MockEntryExtractor::new();
        extractor
            .expect_extract()
            .returning(|_, _, _| Ok(vec![Entry::new(1, "Convocação Maria Souza")]));
        let mut progress = MockProgressRepository::new();
        progress.expect_save().times(1).returning(|_| {
            Err(crate::error::ProgressError::Io {
                path: PathBuf::from("/readonly/marker"),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            })
        });

        let pipeline = pipeline(locator, writing_fetcher(dir.path(), 1), extractor, progress);
        let result = pipeline.process(date(2024, 11, 4)).await;

        assert_eq!(result.entries.len(), 1);
    }

    #[test]
    fn test_backoff_is_linear() {
        let settings = PipelineSettings::new("x");
        assert_eq!(settings.backoff(1), Duration::from_secs(20));
        assert_eq!(settings.backoff(2), Duration::from_secs(40));
        assert_eq!(settings.backoff(3), Duration::from_secs(60));
    }
}
