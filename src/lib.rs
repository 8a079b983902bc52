//! # DOU Watcher
//!
//! Watches Section 3 of the Diário Oficial da União for lines that mention a
//! target name together with a keyword, and reports each edition's outcome.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Entities, calendar, clock and repository traits
//! - **Application Layer** ([`application`]) - Per-date pipeline, backfill, daily loop, reporting
//! - **Infrastructure Layer** ([`infrastructure`]) - Search service, download, PDF, Telegram, files
//!
//! ## Flow
//!
//! For each business day: resolve the edition URL, download and validate the
//! PDF, extract matching lines, save the progress marker, then report. A
//! historical backfill runs in small ordered batches; afterwards a daily loop
//! processes the current date every morning.
//!
//! ## Quick Start
//!
//! ```bash
//! export TARGET_NAME="MARIA DA SILVA"
//! export TELEGRAM_BOT_TOKEN="..."   # Optional
//! export TELEGRAM_CHAT_ID="..."     # Optional
//!
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod runner;

pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{
        BackfillService, DailyScheduler, DatePipeline, DateProcessor, ReportService,
        ResultReporter,
    };
    pub use crate::domain::entities::{EditionReference, Entry, FetchedArtifact, ProcessingResult};
    pub use crate::domain::{BusinessDayCalendar, Clock, FixedClock};
    pub use crate::state::AppState;
}
