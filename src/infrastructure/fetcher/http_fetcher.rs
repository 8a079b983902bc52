//! HTTP download of edition PDFs.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, error, info};

use super::service::DocumentFetcher;
use crate::domain::entities::{EditionReference, FetchedArtifact};
use crate::error::{FetchError, HttpError};
use crate::infrastructure::pdf::validate_document;
use crate::utils::dates::{format_compact_date, format_marker_date};
use crate::utils::text::truncate_chars;

const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Length of the body snippet logged when the server answers with something
/// other than a PDF.
const SNIPPET_CHARS: usize = 500;

/// Downloads editions with a shared client into `work_dir`.
pub struct HttpFetcher {
    client: reqwest::Client,
    work_dir: PathBuf,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(client: reqwest::Client, work_dir: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            client,
            work_dir: work_dir.into(),
            timeout,
        }
    }

    /// Artifact location for `date`: `<work_dir>/dou_latest_DDMMYYYY.pdf`.
    pub fn artifact_path(&self, date: NaiveDate) -> PathBuf {
        self.work_dir
            .join(format!("dou_latest_{}.pdf", format_compact_date(date)))
    }
}

/// True when a `Content-Type` header value declares a PDF.
pub fn is_pdf_content_type(content_type: &str) -> bool {
    content_type.to_lowercase().contains(PDF_CONTENT_TYPE)
}

/// Writes `bytes` to `path` and keeps the file only if it parses as a PDF.
///
/// # Errors
///
/// Returns [`FetchError::Io`] if the write fails and
/// [`FetchError::InvalidDocument`] if validation fails; in both cases the file
/// has been removed.
pub async fn store_validated(
    bytes: &[u8],
    path: &Path,
    date: NaiveDate,
) -> Result<FetchedArtifact, FetchError> {
    if let Err(source) = tokio::fs::write(path, bytes).await {
        let _ = tokio::fs::remove_file(path).await;
        return Err(FetchError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    // Owning the file from here on means any early return deletes it.
    let artifact = FetchedArtifact::new(path.to_path_buf(), date);

    validate_document(path.to_path_buf())
        .await
        .map_err(|reason| FetchError::InvalidDocument {
            path: path.to_path_buf(),
            reason,
        })?;

    Ok(artifact)
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(
        &self,
        reference: &EditionReference,
        date: NaiveDate,
    ) -> Result<FetchedArtifact, FetchError> {
        let url = reference.as_str();
        let date_str = format_marker_date(date);
        let http_error = |e: reqwest::Error| FetchError::Http {
            url: url.to_string(),
            source: HttpError::from(e),
        };

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(http_error)?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_lowercase();

        if !is_pdf_content_type(&content_type) {
            error!(
                date = %date_str,
                content_type = %content_type,
                status = status.as_u16(),
                url = %url,
                "Response is not a PDF"
            );
            if let Ok(body) = response.text().await {
                debug!(date = %date_str, body = %truncate_chars(&body, SNIPPET_CHARS), "Server response");
            }
            return Err(FetchError::ContentType {
                url: url.to_string(),
                content_type,
            });
        }

        let bytes = response.bytes().await.map_err(http_error)?;
        let path = self.artifact_path(date);

        match store_validated(&bytes, &path, date).await {
            Ok(artifact) => {
                info!(date = %date_str, path = %path.display(), size = bytes.len(), "PDF downloaded");
                Ok(artifact)
            }
            Err(e) => {
                error!(date = %date_str, error = %e, "Invalid PDF removed");
                Err(e)
            }
        }
    }
}
