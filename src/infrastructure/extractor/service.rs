//! Entry extractor trait.

use std::path::Path;

use async_trait::async_trait;

use crate::domain::entities::Entry;
use crate::error::ExtractError;

/// Default keyword searched alongside the target name.
pub const DEFAULT_KEYWORD: &str = "Convocação";

/// Reads matching lines out of a downloaded document.
///
/// # Implementations
///
/// - [`crate::infrastructure::extractor::PdfEntryExtractor`] - lopdf page text
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EntryExtractor: Send + Sync {
    /// Returns every line containing both `target_name` and `keyword`
    /// (case-insensitive), page-ascending then line-ascending.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError`] when the document is missing or unreadable.
    /// The pipeline treats this as "no entries".
    async fn extract(
        &self,
        path: &Path,
        target_name: &str,
        keyword: &str,
    ) -> Result<Vec<Entry>, ExtractError>;
}

/// Applies the dual substring match to pre-extracted page texts.
///
/// Pages with no text are skipped. Matching lines are trimmed.
pub fn match_entries<I>(pages: I, target_name: &str, keyword: &str) -> Vec<Entry>
where
    I: IntoIterator<Item = (u32, String)>,
{
    let name = target_name.to_lowercase();
    let keyword = keyword.to_lowercase();

    pages
        .into_iter()
        .filter(|(_, text)| !text.trim().is_empty())
        .flat_map(|(page, text)| {
            text.lines()
                .filter(|line| {
                    let lower = line.to_lowercase();
                    lower.contains(&name) && lower.contains(&keyword)
                })
                .map(|line| Entry::new(page, line.trim()))
                .collect::<Vec<_>>()
        })
        .collect()
}
