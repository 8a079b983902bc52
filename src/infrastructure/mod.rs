//! Infrastructure layer for external integrations.
//!
//! Each integration is a trait plus its concrete implementations, so the
//! application layer can be tested against mocks.
//!
//! # Modules
//!
//! - [`locator`] - Edition URL resolution against the search service
//! - [`fetcher`] - PDF download and validation
//! - [`extractor`] - Matching-line extraction
//! - [`notifier`] - Telegram and log-only report delivery
//! - [`persistence`] - Progress marker storage
//! - [`http`] - Shared client construction
//! - [`pdf`] - lopdf helpers

pub mod extractor;
pub mod fetcher;
pub mod http;
pub mod locator;
pub mod notifier;
pub mod pdf;
pub mod persistence;
