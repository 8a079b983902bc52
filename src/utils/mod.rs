//! Utility functions shared across layers.
//!
//! - [`dates`] - Marker, display and file-name date formats
//! - [`text`] - Message splitting and Markdown escaping

pub mod dates;
pub mod text;
