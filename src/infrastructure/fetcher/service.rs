//! Document fetcher trait.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::entities::{EditionReference, FetchedArtifact};
use crate::error::FetchError;

/// Downloads an edition to local disk and validates it.
///
/// # Implementations
///
/// - [`crate::infrastructure::fetcher::HttpFetcher`] - reqwest download + lopdf validation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Downloads `reference` into an artifact keyed by `date`.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Http`] on network failures and error statuses
    /// - [`FetchError::ContentType`] when the response is not a PDF
    /// - [`FetchError::Io`] when the file cannot be written
    /// - [`FetchError::InvalidDocument`] when the written file does not parse
    ///
    /// No file is left on disk when an error is returned.
    async fn fetch(
        &self,
        reference: &EditionReference,
        date: NaiveDate,
    ) -> Result<FetchedArtifact, FetchError>;
}
