//! Core domain entities of the ingestion pipeline.
//!
//! Entities are plain data structures. The only one with behaviour is
//! [`FetchedArtifact`], which deletes its file when dropped.
//!
//! # Entity Types
//!
//! - [`EditionReference`] - URL of one downloadable edition
//! - [`FetchedArtifact`] - Downloaded, validated document on disk
//! - [`Entry`] - One matching line
//! - [`ProcessingResult`] - Everything notification needs for one date

pub mod artifact;
pub mod edition;
pub mod entry;
pub mod processing_result;

pub use artifact::FetchedArtifact;
pub use edition::EditionReference;
pub use entry::{Entry, SECTION_LABEL};
pub use processing_result::ProcessingResult;
