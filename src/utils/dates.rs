//! Date formatting helpers shared by the pipeline, the progress store and
//! notification messages.

use chrono::{NaiveDate, ParseResult};

/// Format used by the progress marker file and by configuration (`DD-MM-YYYY`).
pub const MARKER_FORMAT: &str = "%d-%m-%Y";

/// Format used in human-facing messages (`DD/MM/YYYY`).
pub const DISPLAY_FORMAT: &str = "%d/%m/%Y";

/// Parses a `DD-MM-YYYY` date, ignoring surrounding whitespace.
pub fn parse_marker_date(value: &str) -> ParseResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), MARKER_FORMAT)
}

pub fn format_marker_date(date: NaiveDate) -> String {
    date.format(MARKER_FORMAT).to_string()
}

pub fn format_display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_FORMAT).to_string()
}

/// `DDMMYYYY`, used to key artifact file names.
pub fn format_compact_date(date: NaiveDate) -> String {
    date.format("%d%m%Y").to_string()
}
