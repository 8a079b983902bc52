//! Error types for the ingestion pipeline.
//!
//! Each component owns one error enum. Components resolve their errors as close
//! to the origin as possible: the locator turns failures into "not found", the
//! extractor into an empty result and the progress store into "absent". These
//! types exist so the failure class can be logged precisely before that happens.

use std::path::PathBuf;

use thiserror::Error;

/// Classification of a failed HTTP exchange.
///
/// Shared by the locator, fetcher and notifier so that server-side failures
/// (5xx) can be told apart from everything else in logs.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request timed out")]
    Timeout,

    #[error("connection error: {0}")]
    Connect(String),

    #[error("HTTP status {status}")]
    Status { status: u16 },

    #[error("network error: {0}")]
    Other(String),
}

impl HttpError {
    /// Returns true for 5xx responses.
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Status { status } if *status >= 500)
    }

    /// Returns true for failures worth retrying right away (timeouts, connection
    /// drops, 429 and 5xx).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout | Self::Connect(_) => true,
            Self::Status { status } => *status == 429 || *status >= 500,
            Self::Other(_) => false,
        }
    }
}

impl From<reqwest::Error> for HttpError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if let Some(status) = err.status() {
            Self::Status {
                status: status.as_u16(),
            }
        } else if err.is_connect() {
            Self::Connect(err.to_string())
        } else {
            Self::Other(err.to_string())
        }
    }
}

/// Errors raised while resolving the edition URL for a date.
#[derive(Debug, Error)]
pub enum LocateError {
    #[error("failed to build search session: {0}")]
    Session(String),

    #[error("referer request to {url} failed: {source}")]
    Referer { url: String, source: HttpError },

    #[error("search request to {url} failed: {source}")]
    Search { url: String, source: HttpError },
}

impl LocateError {
    /// The HTTP failure behind this error, if any.
    pub fn http(&self) -> Option<&HttpError> {
        match self {
            Self::Referer { source, .. } | Self::Search { source, .. } => Some(source),
            Self::Session(_) => None,
        }
    }
}

/// Errors raised while downloading and validating a document.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("download of {url} failed: {source}")]
    Http { url: String, source: HttpError },

    #[error("unexpected content type '{content_type}' from {url}")]
    ContentType { url: String, content_type: String },

    #[error("failed to write artifact {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("artifact {path} is not a valid PDF: {reason}")]
    InvalidDocument { path: PathBuf, reason: String },
}

/// Errors raised while reading entries out of a document.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("document not found: {0}")]
    Missing(PathBuf),

    #[error("failed to open document {path}: {reason}")]
    Open { path: PathBuf, reason: String },

    #[error("extraction task failed: {0}")]
    Task(String),
}

/// Errors raised by the progress marker store.
#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("progress file I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Errors raised while delivering notifications.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification request failed: {0}")]
    Http(#[from] HttpError),

    #[error("notification API rejected the request: {0}")]
    Api(String),
}

impl NotifyError {
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => e.is_transient(),
            Self::Api(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_classification() {
        assert!(HttpError::Status { status: 500 }.is_server_error());
        assert!(HttpError::Status { status: 503 }.is_server_error());
        assert!(!HttpError::Status { status: 404 }.is_server_error());
        assert!(!HttpError::Timeout.is_server_error());
    }

    #[test]
    fn test_transient_classification() {
        assert!(HttpError::Timeout.is_transient());
        assert!(HttpError::Connect("refused".to_string()).is_transient());
        assert!(HttpError::Status { status: 429 }.is_transient());
        assert!(HttpError::Status { status: 502 }.is_transient());
        assert!(!HttpError::Status { status: 400 }.is_transient());
        assert!(!NotifyError::Api("chat not found".to_string()).is_transient());
    }

    #[test]
    fn test_locate_error_exposes_http_source() {
        let err = LocateError::Search {
            url: "https://example.com".to_string(),
            source: HttpError::Status { status: 500 },
        };
        assert!(err.http().is_some_and(HttpError::is_server_error));
        assert!(LocateError::Session("tls".to_string()).http().is_none());
    }
}
