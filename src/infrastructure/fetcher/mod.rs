//! Edition download and validation.
//!
//! Provides a [`DocumentFetcher`] trait with one implementation:
//! - [`HttpFetcher`] - reqwest download, content-type check, lopdf validation

mod http_fetcher;
mod service;

pub use http_fetcher::{HttpFetcher, is_pdf_content_type, store_validated};
pub use service::DocumentFetcher;

#[cfg(test)]
pub use service::MockDocumentFetcher;
