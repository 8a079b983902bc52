//! Persistence implementations of domain repository traits.
//!
//! # Repositories
//!
//! - [`FileProgressRepository`] - Progress marker stored in a small text file

pub mod file_progress_repository;

pub use file_progress_repository::FileProgressRepository;
