//! Unit tests for the Temporal module
//!
//! Tests cover month arithmetic, ISO parsing, date windows and
//! timezone-aware "today".

use chrono::NaiveDate;
use core_kernel::temporal::{add_months, add_months_and_days, parse_iso_date};
use core_kernel::{DateWindow, TemporalError, Timezone};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

mod month_arithmetic {
    use super::*;

    #[test]
    fn test_quarterly_spacing_from_new_year() {
        let start = date(2015, 1, 1);
        assert_eq!(add_months(start, 3).unwrap(), date(2015, 4, 1));
        assert_eq!(add_months(start, 9).unwrap(), date(2015, 10, 1));
    }

    #[test]
    fn test_crosses_year_boundary() {
        assert_eq!(add_months(date(2015, 11, 15), 3).unwrap(), date(2016, 2, 15));
    }

    #[test]
    fn test_cancel_date_offset() {
        assert_eq!(
            add_months_and_days(date(2015, 1, 1), 1, 14).unwrap(),
            date(2015, 2, 15)
        );
    }

    #[test]
    fn test_overflow_is_an_error() {
        let result = add_months(NaiveDate::MAX, 1);
        assert!(matches!(result, Err(TemporalError::Overflow { .. })));
    }
}

mod parsing {
    use super::*;

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(parse_iso_date("2015-02-01").unwrap(), date(2015, 2, 1));
    }

    #[test]
    fn test_parse_rejects_other_formats() {
        assert!(matches!(
            parse_iso_date("02/01/2015"),
            Err(TemporalError::InvalidDate(_))
        ));
    }
}

mod windows {
    use super::*;

    #[test]
    fn test_window_rejects_inverted_bounds() {
        let result = DateWindow::new(date(2015, 3, 1), date(2015, 2, 1));
        assert!(matches!(result, Err(TemporalError::InvalidWindow { .. })));
    }

    #[test]
    fn test_single_day_window() {
        let window = DateWindow::new(date(2015, 3, 1), date(2015, 3, 1)).unwrap();
        assert!(window.contains(date(2015, 3, 1)));
    }
}

mod timezones {
    use super::*;

    #[test]
    fn test_from_name() {
        let tz = Timezone::from_name("America/New_York").unwrap();
        assert_eq!(tz.0.name(), "America/New_York");
    }

    #[test]
    fn test_from_name_rejects_unknown() {
        assert!(matches!(
            Timezone::from_name("Mars/Olympus_Mons"),
            Err(TemporalError::InvalidTimezone(_))
        ));
    }

    #[test]
    fn test_resolve_prefers_explicit_date() {
        let tz = Timezone::default();
        assert_eq!(tz.resolve(Some(date(2015, 1, 1))), date(2015, 1, 1));
    }

    #[test]
    fn test_serde_uses_iana_name() {
        let tz = Timezone::from_name("Europe/London").unwrap();
        let json = serde_json::to_string(&tz).unwrap();
        assert_eq!(json, "\"Europe/London\"");
        let back: Timezone = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tz);
    }
}
