//! Repository trait definitions for the domain layer.
//!
//! # Available Repositories
//!
//! - [`ProgressRepository`] - Resumable backfill checkpoint
//!
//! Implementations live in `crate::infrastructure::persistence`; mocks are
//! generated with `mockall` for unit tests.

pub mod progress_repository;

pub use progress_repository::ProgressRepository;

#[cfg(test)]
pub use progress_repository::MockProgressRepository;
