//! Document locator trait.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::entities::EditionReference;

/// Resolves the full-edition download URL for a date.
///
/// # Implementations
///
/// - [`crate::infrastructure::locator::GazetteLocator`] - two-step query against the Imprensa Nacional search
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentLocator: Send + Sync {
    /// Returns the edition for `date`, or `None` when it cannot be found.
    ///
    /// Network failures are logged by the implementation and reported as
    /// `None`; they never reach the caller.
    async fn locate(&self, date: NaiveDate) -> Option<EditionReference>;
}
