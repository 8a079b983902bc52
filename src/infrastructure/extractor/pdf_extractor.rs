//! lopdf-backed entry extraction.

use std::path::Path;

use async_trait::async_trait;
use tracing::{error, info};

use super::service::{EntryExtractor, match_entries};
use crate::domain::entities::Entry;
use crate::error::ExtractError;
use crate::infrastructure::pdf::{load_document, page_texts};

/// Extracts entries from a PDF on a blocking thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfEntryExtractor;

impl PdfEntryExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EntryExtractor for PdfEntryExtractor {
    async fn extract(
        &self,
        path: &Path,
        target_name: &str,
        keyword: &str,
    ) -> Result<Vec<Entry>, ExtractError> {
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            error!(path = %path.display(), "PDF file not found");
            return Err(ExtractError::Missing(path.to_path_buf()));
        }

        let owned_path = path.to_path_buf();
        let name = target_name.to_string();
        let keyword = keyword.to_string();

        let entries = tokio::task::spawn_blocking(move || {
            let document = load_document(&owned_path).map_err(|reason| ExtractError::Open {
                path: owned_path.clone(),
                reason,
            })?;
            Ok::<_, ExtractError>(match_entries(page_texts(&document), &name, &keyword))
        })
        .await
        .map_err(|e| ExtractError::Task(e.to_string()))??;

        info!(
            path = %path.display(),
            target = %target_name,
            count = entries.len(),
            "Entries extracted"
        );
        Ok(entries)
    }
}
