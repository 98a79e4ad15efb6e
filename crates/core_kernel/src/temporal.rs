//! Calendar arithmetic for policy terms and ages
//!
//! All functions here work on `NaiveDate` and never consult the clock. The
//! caller decides what "today" is, usually through [`Timezone::today`] for
//! the brokerage's jurisdiction, and passes it in.

use chrono::{Datelike, Days, Months, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use thiserror::Error;

/// Timezone wrapper for the brokerage jurisdiction
///
/// Wraps chrono_tz::Tz with string serialization so it can be read from
/// configuration.
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

    /// Today's calendar date in this timezone
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.0).date_naive()
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self(chrono_tz::UTC)
    }
}

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid period: start {start} must be before end {end}")]
    InvalidPeriod {
        start: String,
        end: String,
    },

    #[error("Date arithmetic overflowed adding {months} months to {start}")]
    DateOverflow {
        start: String,
        months: u32,
    },

    #[error("Birth date {birth} is after {as_of}")]
    BirthDateInFuture {
        birth: String,
        as_of: String,
    },
}

/// Completed years of age on `as_of` for someone born on `birth`
///
/// Uses calendar subtraction: the age only increments once the month/day of
/// the birthday has been reached. Someone born on Feb 29 turns a year older
/// on Mar 1 in non-leap years.
pub fn age_on(birth: NaiveDate, as_of: NaiveDate) -> Result<u32, TemporalError> {
    if birth > as_of {
        return Err(TemporalError::BirthDateInFuture {
            birth: birth.to_string(),
            as_of: as_of.to_string(),
        });
    }

    let mut years = as_of.year() - birth.year();
    if (as_of.month(), as_of.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    Ok(years as u32)
}

/// Last covered day of a term of `months` starting on `start`
///
/// `end = start + months - 1 day`. Month addition clamps to the last valid
/// day, so a term starting Jan 31 with one month ends Feb 27 (or 28 in
/// leap years).
pub fn policy_end_date(start: NaiveDate, months: u32) -> Result<NaiveDate, TemporalError> {
    start
        .checked_add_months(Months::new(months))
        .and_then(|d| d.checked_sub_days(Days::new(1)))
        .ok_or_else(|| TemporalError::DateOverflow {
            start: start.to_string(),
            months,
        })
}

/// Coverage term of a policy, both ends inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyTerm {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PolicyTerm {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, TemporalError> {
        if start >= end {
            return Err(TemporalError::InvalidPeriod {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Builds the term covering `months` months from `start`
    pub fn from_duration(start: NaiveDate, months: u32) -> Result<Self, TemporalError> {
        let end = policy_end_date(start, months)?;
        Self::new(start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_end_date_twelve_months() {
        assert_eq!(policy_end_date(date(2024, 1, 15), 12).unwrap(), date(2025, 1, 14));
    }

    #[test]
    fn test_end_date_clamps_month_end() {
        assert_eq!(policy_end_date(date(2023, 1, 31), 1).unwrap(), date(2023, 2, 27));
        assert_eq!(policy_end_date(date(2024, 1, 31), 1).unwrap(), date(2024, 2, 28));
    }

    #[test]
    fn test_age_birthday_not_yet_reached() {
        assert_eq!(age_on(date(2000, 6, 16), date(2024, 6, 15)).unwrap(), 23);
        assert_eq!(age_on(date(2000, 6, 15), date(2024, 6, 15)).unwrap(), 24);
    }

    #[test]
    fn test_term_rejects_inverted_range() {
        let result = PolicyTerm::new(date(2024, 2, 1), date(2024, 1, 1));
        assert!(matches!(result, Err(TemporalError::InvalidPeriod { .. })));
    }
}
