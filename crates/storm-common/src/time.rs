//! Date and year-range handling for storm observations.
//!
//! Observation dates are integers in `YYYYMMDD` form. The year is always
//! derived with integer division (`date / 10000`), never by parsing.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Derive the calendar year from a `YYYYMMDD` date.
#[inline]
pub fn year_of(date: u32) -> i32 {
    (date / 10000) as i32
}

/// Convert a `YYYYMMDD` date to a calendar date, if it names a real day.
pub fn to_naive_date(date: u32) -> Option<NaiveDate> {
    let year = year_of(date);
    let month = (date / 100) % 100;
    let day = date % 100;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Format a `YYYYMMDD` date as `MM/DD/YYYY`.
///
/// Falls back to slicing the digits when the date is not a real calendar
/// day, so display never fails.
pub fn format_display_date(date: u32) -> String {
    match to_naive_date(date) {
        Some(d) => d.format("%m/%d/%Y").to_string(),
        None => {
            let s = format!("{:08}", date);
            format!("{}/{}/{}", &s[4..6], &s[6..8], &s[0..4])
        }
    }
}

/// An inclusive range of calendar years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    /// Check whether a year falls inside the range (both ends inclusive).
    pub fn contains(&self, year: i32) -> bool {
        year >= self.start && year <= self.end
    }

    /// Check whether a `YYYYMMDD` date falls inside the range.
    pub fn contains_date(&self, date: u32) -> bool {
        self.contains(year_of(date))
    }

    /// Number of years between the endpoints (`end - start`).
    pub fn span(&self) -> i32 {
        self.end - self.start
    }

    /// Parse `"START-END"` or `"START..END"`.
    pub fn parse(s: &str) -> Result<Self, RangeParseError> {
        let (start, end) = s
            .split_once("..")
            .or_else(|| s.split_once('-'))
            .ok_or_else(|| RangeParseError::InvalidFormat(s.to_string()))?;

        let start = start
            .trim()
            .parse()
            .map_err(|_| RangeParseError::InvalidYear(start.trim().to_string()))?;
        let end = end
            .trim()
            .parse()
            .map_err(|_| RangeParseError::InvalidYear(end.trim().to_string()))?;

        Ok(Self { start, end })
    }
}

impl std::fmt::Display for YearRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RangeParseError {
    #[error("Invalid year range: {0}. Expected 'START-END'")]
    InvalidFormat(String),

    #[error("Invalid year: {0}")]
    InvalidYear(String),
}

/// Reasons a requested time window is rejected.
///
/// Each condition is distinct so callers can tell the user exactly what to fix.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    #[error("Start year must be less than or equal to end year ({start} > {end})")]
    Inverted { start: i32, end: i32 },

    #[error("Year difference between two years must be greater than or equal to {min_span} (got {span})")]
    TooNarrow { span: i32, min_span: i32 },

    #[error("Start year must be no greater than {limit} (got {year})")]
    StartTooLate { year: i32, limit: i32 },

    #[error("Start year must be no less than {limit} (got {year})")]
    StartTooEarly { year: i32, limit: i32 },

    #[error("End year must be no greater than {limit} (got {year})")]
    EndTooLate { year: i32, limit: i32 },

    #[error("End year must be no less than {limit} (got {year})")]
    EndTooEarly { year: i32, limit: i32 },
}

/// Bounds a requested time window must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeLimits {
    pub min_start: i32,
    pub max_start: i32,
    pub min_end: i32,
    pub max_end: i32,
    /// Minimum `end - start`
    pub min_span: i32,
}

impl Default for RangeLimits {
    fn default() -> Self {
        Self {
            min_start: 1851,
            max_start: 2014,
            min_end: 1861,
            max_end: 2024,
            min_span: 10,
        }
    }
}

impl RangeLimits {
    /// The widest window the limits allow.
    pub fn full_range(&self) -> YearRange {
        YearRange::new(self.min_start, self.max_end)
    }

    /// Validate a requested window.
    ///
    /// Conditions are checked in a fixed order (inversion, span, start upper
    /// bound, start lower bound, end upper bound, end lower bound) and the
    /// first failure is reported.
    pub fn validate(&self, start: i32, end: i32) -> Result<YearRange, RangeError> {
        if start > end {
            return Err(RangeError::Inverted { start, end });
        }

        if end - start < self.min_span {
            return Err(RangeError::TooNarrow {
                span: end - start,
                min_span: self.min_span,
            });
        }

        if start > self.max_start {
            return Err(RangeError::StartTooLate {
                year: start,
                limit: self.max_start,
            });
        }

        if start < self.min_start {
            return Err(RangeError::StartTooEarly {
                year: start,
                limit: self.min_start,
            });
        }

        if end > self.max_end {
            return Err(RangeError::EndTooLate {
                year: end,
                limit: self.max_end,
            });
        }

        if end < self.min_end {
            return Err(RangeError::EndTooEarly {
                year: end,
                limit: self.min_end,
            });
        }

        Ok(YearRange::new(start, end))
    }
}
