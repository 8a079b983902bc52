//! Edition URL resolution.
//!
//! Provides a [`DocumentLocator`] trait with one implementation:
//! - [`GazetteLocator`] - Imprensa Nacional search service
//!
//! The listing parser lives in [`listing`] and can be exercised without HTTP.

mod gazette_locator;
pub mod listing;
mod service;

pub use gazette_locator::{
    DEFAULT_DOWNLOAD_BASE, DEFAULT_REFERER_BASE, DEFAULT_SEARCH_URL, GazetteLocator,
    LocatorSettings,
};
pub use service::DocumentLocator;

#[cfg(test)]
pub use service::MockDocumentLocator;
