//! Unit tests for calendar arithmetic
//!
//! Tests cover policy end dates, calendar-correct ages, the PolicyTerm
//! range type, and Timezone serialization.

use chrono::NaiveDate;
use core_kernel::{age_on, policy_end_date, PolicyTerm, TemporalError, Timezone};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

mod end_date {
    use super::*;

    #[test]
    fn test_twelve_month_term_ends_day_before_anniversary() {
        assert_eq!(policy_end_date(date(2024, 1, 15), 12).unwrap(), date(2025, 1, 14));
    }

    #[test]
    fn test_term_crossing_leap_day() {
        assert_eq!(policy_end_date(date(2024, 2, 29), 12).unwrap(), date(2025, 2, 27));
    }

    #[test]
    fn test_one_month_term_from_first_of_month() {
        assert_eq!(policy_end_date(date(2024, 3, 1), 1).unwrap(), date(2024, 3, 31));
    }

    #[test]
    fn test_zero_months_ends_day_before_start() {
        assert_eq!(policy_end_date(date(2024, 3, 1), 0).unwrap(), date(2024, 2, 29));
    }

    #[test]
    fn test_overflow_is_reported() {
        let result = policy_end_date(NaiveDate::MAX, 12);
        assert!(matches!(result, Err(TemporalError::DateOverflow { .. })));
    }
}

mod age {
    use super::*;

    #[test]
    fn test_birthday_tomorrow_is_one_year_younger() {
        let as_of = date(2024, 6, 15);
        assert_eq!(age_on(date(1999, 6, 16), as_of).unwrap(), 24);
        assert_eq!(age_on(date(1999, 6, 15), as_of).unwrap(), 25);
    }

    #[test]
    fn test_leap_day_birthday_in_non_leap_year() {
        let birth = date(2000, 2, 29);
        assert_eq!(age_on(birth, date(2023, 2, 28)).unwrap(), 22);
        assert_eq!(age_on(birth, date(2023, 3, 1)).unwrap(), 23);
    }

    #[test]
    fn test_born_today_is_zero() {
        assert_eq!(age_on(date(2024, 6, 15), date(2024, 6, 15)).unwrap(), 0);
    }

    #[test]
    fn test_future_birth_date_is_an_error() {
        let result = age_on(date(2024, 6, 16), date(2024, 6, 15));
        assert!(matches!(result, Err(TemporalError::BirthDateInFuture { .. })));
    }
}

mod policy_term {
    use super::*;

    #[test]
    fn test_from_duration() {
        let term = PolicyTerm::from_duration(date(2024, 1, 15), 12).unwrap();
        assert_eq!(term.start, date(2024, 1, 15));
        assert_eq!(term.end, date(2025, 1, 14));
    }

    #[test]
    fn test_zero_month_term_is_rejected() {
        let result = PolicyTerm::from_duration(date(2024, 1, 15), 0);
        assert!(matches!(result, Err(TemporalError::InvalidPeriod { .. })));
    }

    #[test]
    fn test_same_day_term_is_rejected() {
        let result = PolicyTerm::new(date(2024, 1, 1), date(2024, 1, 1));
        assert!(matches!(result, Err(TemporalError::InvalidPeriod { .. })));
    }
}

mod timezone {
    use super::*;

    #[test]
    fn test_round_trips_through_json() {
        let tz = Timezone::new(chrono_tz::America::Mexico_City);
        let json = serde_json::to_string(&tz).unwrap();
        assert_eq!(json, "\"America/Mexico_City\"");
        let back: Timezone = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tz);
    }

    #[test]
    fn test_unknown_zone_is_rejected() {
        let result: Result<Timezone, _> = serde_json::from_str("\"Mars/Olympus\"");
        assert!(result.is_err());
    }
}
