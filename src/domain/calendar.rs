//! Business-day calendar used to decide which dates have an edition.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::utils::dates::parse_marker_date;

/// Holidays skipped when no `HOLIDAYS` override is configured (`DD-MM-YYYY`).
pub const DEFAULT_HOLIDAYS: &[&str] = &[
    "01-01-2024",
    "20-04-2024",
    "01-05-2024",
    "07-09-2024",
    "12-10-2024",
    "02-11-2024",
    "15-11-2024",
    "20-11-2024",
    "25-12-2024",
    "01-01-2025",
    "20-04-2025",
    "01-05-2025",
    "07-09-2025",
    "12-10-2025",
    "02-11-2025",
    "15-11-2025",
    "20-11-2025",
    "25-12-2025",
];

/// Weekends plus a fixed holiday set.
///
/// Built once at startup and shared read-only between the backfill and the
/// daily loop.
#[derive(Debug, Clone, Default)]
pub struct BusinessDayCalendar {
    holidays: HashSet<NaiveDate>,
}

impl BusinessDayCalendar {
    pub fn new(holidays: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            holidays: holidays.into_iter().collect(),
        }
    }

    /// Parses a list of `DD-MM-YYYY` strings.
    ///
    /// # Errors
    ///
    /// Returns the first entry that does not parse.
    pub fn from_strings<S: AsRef<str>>(values: &[S]) -> Result<Self, String> {
        let mut holidays = HashSet::with_capacity(values.len());
        for value in values {
            let value = value.as_ref().trim();
            if value.is_empty() {
                continue;
            }
            let date = parse_marker_date(value).map_err(|_| value.to_string())?;
            holidays.insert(date);
        }
        Ok(Self { holidays })
    }

    pub fn is_weekend(date: NaiveDate) -> bool {
        matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date)
    }

    /// True unless the date is a weekend day or a listed holiday.
    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        !Self::is_weekend(date) && !self.is_holiday(date)
    }

    /// Walks backward from `date` (inclusive) to the nearest business day.
    pub fn last_business_day_on_or_before(&self, date: NaiveDate) -> NaiveDate {
        let mut current = date;
        while !self.is_business_day(current) {
            match current.pred_opt() {
                Some(prev) => current = prev,
                None => break,
            }
        }
        current
    }

    pub fn holiday_count(&self) -> usize {
        self.holidays.len()
    }
}
