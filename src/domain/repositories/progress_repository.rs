//! Repository trait for the resumable progress marker.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::ProgressError;

/// Durable storage for the last date whose processing reached a terminal outcome.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::FileProgressRepository`] - single text file
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Overwrites the stored marker with `date`.
    ///
    /// # Errors
    ///
    /// Returns [`ProgressError::Io`] when the marker cannot be written. Callers
    /// log the error and carry on.
    async fn save(&self, date: NaiveDate) -> Result<(), ProgressError>;

    /// Reads the stored marker.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(date))` when a marker exists
    /// - `Ok(None)` when nothing has been stored yet, or the stored content
    ///   does not parse (logged by the implementation)
    ///
    /// # Errors
    ///
    /// Returns [`ProgressError::Io`] on read failures. Callers treat it as absent.
    async fn load(&self) -> Result<Option<NaiveDate>, ProgressError>;

    /// Deletes the stored marker. Clearing an absent marker is not an error.
    async fn clear(&self) -> Result<(), ProgressError>;
}
