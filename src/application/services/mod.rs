//! Business logic services for the application layer.

pub mod backfill_service;
pub mod daily_service;
pub mod pipeline_service;
pub mod report_service;

pub use backfill_service::{BackfillService, BackfillSettings, BackfillSummary};
pub use daily_service::{DailyScheduler, DailySettings};
pub use pipeline_service::{DatePipeline, DateProcessor, PipelineSettings};
pub use report_service::{ReportService, ReportSettings, ResultReporter};
