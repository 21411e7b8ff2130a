//! Calendar date handling for billing
//!
//! Billing works on calendar dates, not instants. This module provides:
//! - Month arithmetic that clamps to the end of shorter months
//! - Inclusive date windows
//! - A timezone wrapper that decides what "today" means for a book of business

use chrono::{Days, Months, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use thiserror::Error;

/// ISO date format accepted at system boundaries
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Date overflow: {date} + {months} months + {days} days")]
    Overflow {
        date: NaiveDate,
        months: u32,
        days: u64,
    },

    #[error("Invalid window: start {start} is after end {end}")]
    InvalidWindow {
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),
}

/// Adds calendar months, clamping the day to the last day of the target month
///
/// `2015-01-31 + 1 month` is `2015-02-28`.
pub fn add_months(date: NaiveDate, months: u32) -> Result<NaiveDate, TemporalError> {
    add_months_and_days(date, months, 0)
}

/// Adds calendar months first, then whole days
pub fn add_months_and_days(
    date: NaiveDate,
    months: u32,
    days: u64,
) -> Result<NaiveDate, TemporalError> {
    date.checked_add_months(Months::new(months))
        .and_then(|d| d.checked_add_days(Days::new(days)))
        .ok_or(TemporalError::Overflow { date, months, days })
}

/// Parses a `YYYY-MM-DD` date
pub fn parse_iso_date(value: &str) -> Result<NaiveDate, TemporalError> {
    NaiveDate::parse_from_str(value.trim(), ISO_DATE_FORMAT)
        .map_err(|_| TemporalError::InvalidDate(value.to_string()))
}

/// An inclusive range of calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    /// First day of the window (inclusive)
    pub start: NaiveDate,
    /// Last day of the window (inclusive)
    pub end: NaiveDate,
}

impl DateWindow {
    /// Creates a new window, rejecting a start after the end
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, TemporalError> {
        if start > end {
            return Err(TemporalError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Returns true if `date` falls within the window, bounds included
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Timezone wrapper for the book of business
///
/// Wraps chrono_tz::Tz with custom serialization support. Operations that
/// default their date cursor to "today" ask the timezone which day that is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timezone(pub Tz);

impl Serialize for Timezone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.0.name())
    }
}

impl<'de> Deserialize<'de> for Timezone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Tz::from_str(&s)
            .map(Timezone)
            .map_err(|_| serde::de::Error::custom(format!("Invalid timezone: {}", s)))
    }
}

impl Timezone {
    pub fn new(tz: Tz) -> Self {
        Self(tz)
    }

    /// Parses an IANA timezone name such as `America/New_York`
    pub fn from_name(name: &str) -> Result<Self, TemporalError> {
        Tz::from_str(name)
            .map(Timezone)
            .map_err(|_| TemporalError::InvalidTimezone(name.to_string()))
    }

    /// The current calendar date in this timezone
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.0).date_naive()
    }

    /// Returns `date`, or today when none was supplied
    pub fn resolve(&self, date: Option<NaiveDate>) -> NaiveDate {
        date.unwrap_or_else(|| self.today())
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self(chrono_tz::UTC)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_add_months_clamps_to_month_end() {
        assert_eq!(add_months(date(2015, 1, 31), 1).unwrap(), date(2015, 2, 28));
        assert_eq!(add_months(date(2016, 1, 31), 1).unwrap(), date(2016, 2, 29));
    }

    #[test]
    fn test_add_months_and_days_applies_months_first() {
        assert_eq!(
            add_months_and_days(date(2015, 1, 31), 1, 14).unwrap(),
            date(2015, 3, 14)
        );
    }

    #[test]
    fn test_window_is_inclusive() {
        let window = DateWindow::new(date(2015, 2, 1), date(2015, 2, 15)).unwrap();
        assert!(window.contains(date(2015, 2, 1)));
        assert!(window.contains(date(2015, 2, 15)));
        assert!(!window.contains(date(2015, 2, 16)));
    }
}
