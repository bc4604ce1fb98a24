//! Calendar month type for period selection.
//!
//! Cash-flow reports are always scoped to a calendar month. `Month` gives
//! that concept a real type instead of passing `"YYYY-MM"` strings around.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// A calendar month (year + month number), serialized as `"YYYY-MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Month {
    year: i32,
    month: u32,
}

/// Error parsing a `"YYYY-MM"` month string.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid month (expected YYYY-MM): {0}")]
pub struct MonthParseError(pub String);

impl Month {
    /// Creates a month, returning `None` if `month` is outside `1..=12`.
    #[must_use]
    pub const fn new(year: i32, month: u32) -> Option<Self> {
        if matches!(month, 1..=12) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// The month containing the given date.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The year component.
    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// The month number (1-12).
    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    /// The first calendar day of this month.
    #[must_use]
    pub fn first_day(self) -> NaiveDate {
        // month is validated in the constructors, so this cannot fail
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    /// Returns true if the given date falls within this month.
    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// The month immediately after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl std::str::FromStr for Month {
    type Err = MonthParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| MonthParseError(s.to_string()))?;
        let year: i32 = year.parse().map_err(|_| MonthParseError(s.to_string()))?;
        let month: u32 = month.parse().map_err(|_| MonthParseError(s.to_string()))?;
        Self::new(year, month).ok_or_else(|| MonthParseError(s.to_string()))
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_month() {
        assert!(Month::new(2024, 0).is_none());
        assert!(Month::new(2024, 13).is_none());
        assert!(Month::new(2024, 12).is_some());
    }

    #[rstest]
    #[case("2024-03", 2024, 3)]
    #[case("2024-12", 2024, 12)]
    #[case("1999-01", 1999, 1)]
    fn test_parse_valid(#[case] input: &str, #[case] year: i32, #[case] month: u32) {
        let parsed: Month = input.parse().unwrap();
        assert_eq!(parsed, Month::new(year, month).unwrap());
    }

    #[rstest]
    #[case("2024")]
    #[case("2024-00")]
    #[case("2024-13")]
    #[case("march-2024")]
    #[case("")]
    fn test_parse_invalid(#[case] input: &str) {
        assert!(input.parse::<Month>().is_err());
    }

    #[test]
    fn test_display_pads() {
        assert_eq!(Month::new(2024, 3).unwrap().to_string(), "2024-03");
    }

    #[test]
    fn test_first_day_and_contains() {
        let m = Month::new(2024, 2).unwrap();
        assert_eq!(m.first_day(), date(2024, 2, 1));
        assert!(m.contains(date(2024, 2, 29)));
        assert!(!m.contains(date(2024, 3, 1)));
        assert!(!m.contains(date(2023, 2, 15)));
    }

    #[test]
    fn test_next_wraps_year() {
        assert_eq!(
            Month::new(2024, 12).unwrap().next(),
            Month::new(2025, 1).unwrap()
        );
        assert_eq!(
            Month::new(2024, 5).unwrap().next(),
            Month::new(2024, 6).unwrap()
        );
    }

    #[test]
    fn test_ordering() {
        assert!(Month::new(2024, 1).unwrap() < Month::new(2024, 2).unwrap());
        assert!(Month::new(2023, 12).unwrap() < Month::new(2024, 1).unwrap());
    }

    #[test]
    fn test_serde_round_trip() {
        let m = Month::new(2024, 7).unwrap();
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "\"2024-07\"");
        let back: Month = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }
}
