//! File-backed implementation of the progress repository.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::NaiveDate;
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::domain::repositories::ProgressRepository;
use crate::error::ProgressError;
use crate::utils::dates::{format_marker_date, parse_marker_date};

/// Stores the marker as a single `DD-MM-YYYY` line.
///
/// Each save writes a uniquely named temp file next to the marker and renames
/// it over the marker, so a crash mid-write never leaves a truncated date
/// behind and concurrent saves never share a temp file. Concurrent writers
/// race last-writer-wins.
pub struct FileProgressRepository {
    path: PathBuf,
}

impl FileProgressRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> ProgressError {
        ProgressError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Writes `value` to a fresh temp file in the marker's directory, then renames it.
fn write_atomically(path: &Path, value: &str) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(value.as_bytes())?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[async_trait]
impl ProgressRepository for FileProgressRepository {
    async fn save(&self, date: NaiveDate) -> Result<(), ProgressError> {
        let value = format_marker_date(date);
        let path = self.path.clone();
        let contents = value.clone();

        tokio::task::spawn_blocking(move || write_atomically(&path, &contents))
            .await
            .map_err(|e| self.io_error(std::io::Error::other(e)))?
            .map_err(|e| self.io_error(e))?;

        info!(date = %value, "Progress marker saved");
        Ok(())
    }

    async fn load(&self) -> Result<Option<NaiveDate>, ProgressError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        match parse_marker_date(&content) {
            Ok(date) => Ok(Some(date)),
            Err(_) => {
                warn!(
                    path = %self.path.display(),
                    value = %content.trim(),
                    "Unparseable progress marker, treating as absent"
                );
                Ok(None)
            }
        }
    }

    async fn clear(&self) -> Result<(), ProgressError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_load_missing_file_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileProgressRepository::new(dir.path().join("last_processed_date.txt"));

        assert_eq!(repo.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileProgressRepository::new(dir.path().join("last_processed_date.txt"));

        repo.save(date(2024, 11, 5)).await.unwrap();

        assert_eq!(repo.load().await.unwrap(), Some(date(2024, 11, 5)));
        let raw = std::fs::read_to_string(repo.path()).unwrap();
        assert_eq!(raw, "05-11-2024");
    }

    #[tokio::test]
    async fn test_save_overwrites_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileProgressRepository::new(dir.path().join("marker.txt"));

        repo.save(date(2024, 11, 5)).await.unwrap();
        repo.save(date(2024, 11, 6)).await.unwrap();

        assert_eq!(repo.load().await.unwrap(), Some(date(2024, 11, 6)));
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("marker.txt")]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_saves_all_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Arc::new(FileProgressRepository::new(
            dir.path().join("last_processed_date.txt"),
        ));
        let first = date(2024, 11, 4);
        let second = date(2024, 11, 5);

        for _ in 0..200 {
            let a = tokio::spawn({
                let repo = Arc::clone(&repo);
                async move { repo.save(first).await }
            });
            let b = tokio::spawn({
                let repo = Arc::clone(&repo);
                async move { repo.save(second).await }
            });

            assert!(a.await.unwrap().is_ok());
            assert!(b.await.unwrap().is_ok());

            let stored = repo.load().await.unwrap();
            assert!(stored == Some(first) || stored == Some(second));
        }

        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_load_garbage_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("marker.txt");
        std::fs::write(&path, "not a date").unwrap();
        let repo = FileProgressRepository::new(path);

        assert_eq!(repo.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileProgressRepository::new(dir.path().join("missing").join("marker.txt"));

        assert!(matches!(
            repo.save(date(2024, 11, 5)).await,
            Err(ProgressError::Io { .. })
        ));
    }

    #[tokio::test]
    async fn test_clear() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileProgressRepository::new(dir.path().join("marker.txt"));

        repo.clear().await.unwrap();
        repo.save(date(2024, 11, 5)).await.unwrap();
        repo.clear().await.unwrap();

        assert_eq!(repo.load().await.unwrap(), None);
    }
}
