//! Date bucketing helpers for the writing statistics.
//!
//! Bucket keys are zero-padded so that, within one granularity, sorting keys as
//! strings orders them chronologically.

use crate::constants::{DATE_FORMAT_ISO, DATE_FORMAT_MONTH};
use crate::errors::AppError;
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Time bucket size for writing frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Daily => "daily",
            Granularity::Weekly => "weekly",
            Granularity::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Granularity::Daily),
            "weekly" => Ok(Granularity::Weekly),
            "monthly" => Ok(Granularity::Monthly),
            other => Err(AppError::Validation(format!(
                "Unknown granularity '{}': expected daily, weekly or monthly",
                other
            ))),
        }
    }
}

/// Month (1-12) and day-of-month of a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthDay {
    pub month: u32,
    pub day: u32,
}

pub fn month_day(date: NaiveDate) -> MonthDay {
    MonthDay {
        month: date.month(),
        day: date.day(),
    }
}

/// True if both dates fall on the same month and day, whatever the year.
pub fn is_same_month_day(a: NaiveDate, b: NaiveDate) -> bool {
    month_day(a) == month_day(b)
}

/// Formats a date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT_ISO).to_string()
}

/// Week number within the year, with weeks starting on Sunday.
///
/// Computed as `ceil((day_of_year + weekday_offset_of_jan_1) / 7)` where the
/// offset counts days from Sunday, so January 1st is always in week 1 and the
/// result ranges over `1..=54`.
pub fn week_of_year(date: NaiveDate) -> u32 {
    let jan_first_offset = NaiveDate::from_yo_opt(date.year(), 1)
        .map(|jan_first| jan_first.weekday().num_days_from_sunday())
        .unwrap_or(0);

    (date.ordinal() + jan_first_offset).div_ceil(7)
}

/// Canonical group key for `date` at the given granularity.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use daybook::diary_core::dates::{bucket_key, Granularity};
///
/// let date = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
/// assert_eq!(bucket_key(date, Granularity::Daily), "2025-01-05");
/// assert_eq!(bucket_key(date, Granularity::Weekly), "2025-02");
/// assert_eq!(bucket_key(date, Granularity::Monthly), "2025-01");
/// ```
pub fn bucket_key(date: NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::Daily => format_date(date),
        Granularity::Weekly => format!("{:04}-{:02}", date.year(), week_of_year(date)),
        Granularity::Monthly => date.format(DATE_FORMAT_MONTH).to_string(),
    }
}

/// Number of days in `month` of `year`, or `None` for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = first.checked_add_months(Months::new(1))?;
    u32::try_from((next - first).num_days()).ok()
}
