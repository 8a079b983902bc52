//! Downloaded document artifact with scoped ownership.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use chrono::NaiveDate;

/// A validated document on local disk.
///
/// The handle owns the file: dropping it deletes the file. This covers every
/// way a pipeline invocation can end, including an early return, a panic
/// unwinding through the caller and the future being dropped on cancellation.
#[derive(Debug)]
pub struct FetchedArtifact {
    path: PathBuf,
    date: NaiveDate,
}

impl FetchedArtifact {
    /// Takes ownership of an existing file.
    pub fn new(path: PathBuf, date: NaiveDate) -> Self {
        Self { path, date }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Reads the whole document into memory.
    pub async fn read_bytes(&self) -> std::io::Result<Bytes> {
        tokio::fs::read(&self.path).await.map(Bytes::from)
    }
}

impl Drop for FetchedArtifact {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::info!(path = %self.path.display(), "Temporary PDF removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "Failed to remove temporary PDF")
            }
        }
    }
}
