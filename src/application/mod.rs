//! Application layer services implementing the ingestion workflow.
//!
//! Services consume infrastructure traits and are wired together once at
//! startup (see [`crate::state::AppState`]).
//!
//! # Available Services
//!
//! - [`services::pipeline_service::DatePipeline`] - One date: locate, fetch, extract, retry
//! - [`services::backfill_service::BackfillService`] - Historical range in ordered batches
//! - [`services::daily_service::DailyScheduler`] - Once per business day, forever
//! - [`services::report_service::ReportService`] - Message formatting and delivery

pub mod services;
