//! Outcome of processing one date.

use std::path::PathBuf;

use bytes::Bytes;
use chrono::NaiveDate;

use super::Entry;

/// The unit handed to notification after a pipeline run.
///
/// `artifact` names the file the entries were read from; the file itself is
/// gone by the time the result is returned. When entries were found,
/// `document` carries the PDF bytes so they can still be attached.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingResult {
    pub entries: Vec<Entry>,
    pub date: NaiveDate,
    pub artifact: Option<PathBuf>,
    pub document: Option<Bytes>,
}

impl ProcessingResult {
    /// A result with no entries and no artifact.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            entries: Vec::new(),
            date,
            artifact: None,
            document: None,
        }
    }

    pub fn has_entries(&self) -> bool {
        !self.entries.is_empty()
    }
}
