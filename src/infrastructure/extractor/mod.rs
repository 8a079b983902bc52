//! Matching-line extraction from downloaded editions.
//!
//! Provides an [`EntryExtractor`] trait with one implementation:
//! - [`PdfEntryExtractor`] - lopdf page text
//!
//! The line matching itself is [`match_entries`], independent of the PDF reader.

mod pdf_extractor;
mod service;

pub use pdf_extractor::PdfEntryExtractor;
pub use service::{DEFAULT_KEYWORD, EntryExtractor, match_entries};

#[cfg(test)]
pub use service::MockEntryExtractor;
