//! Timestamp value object
//!
//! A `Timestamp` is a point in one calendar type's local coordinate system:
//! day, month, optional year, hour, and the fraction of that hour. The raw
//! fields carry no meaning on their own; a `CalendarType` says how many days a
//! month has or how many hours a day has. Timestamps from different calendar
//! types must not be compared.
//!
//! # Ordering
//!
//! Timestamps are totally ordered, lexicographically over
//! `(year, month, day, hour, moment)`. `moment` is the final tiebreaker once
//! every other field is equal.
//!
//! Undated timestamps (`year == None`) sort before every dated timestamp. Two
//! undated timestamps compare on month, day, hour, and moment only, as if they
//! shared one unknown year.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// English ordinal endings indexed by the last digit.
const ORDINAL_ENDINGS: [&str; 10] = ["th", "st", "nd", "rd", "th", "th", "th", "th", "th", "th"];

/// Returns the English ordinal suffix for a number (st, nd, rd, th).
///
/// 11, 12 and 13 (and 111, 212, ...) take "th".
pub fn ordinal_suffix(n: u32) -> &'static str {
    if (11..=13).contains(&(n % 100)) {
        "th"
    } else {
        ORDINAL_ENDINGS[(n % 10) as usize]
    }
}

/// Formats a number with its English ordinal suffix (e.g., "21st").
pub fn ordinal(n: u32) -> String {
    format!("{}{}", n, ordinal_suffix(n))
}

/// An immutable point in a calendar type's local coordinate system.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "TimestampFields", into = "TimestampFields")]
pub struct Timestamp {
    day: u32,
    month: u32,
    year: Option<i32>,
    hour: u32,
    moment: f64,
}

/// Wire shape of a timestamp; validated on the way in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct TimestampFields {
    day: u32,
    month: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    year: Option<i32>,
    #[serde(default)]
    hour: u32,
    #[serde(default)]
    moment: f64,
}

impl Timestamp {
    /// Create a timestamp at the start (hour 0) of the given day.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `day` or `month` is zero.
    pub fn new(day: u32, month: u32, year: Option<i32>) -> Result<Self, DomainError> {
        if day < 1 {
            return Err(DomainError::validation("Day must be at least 1"));
        }
        if month < 1 {
            return Err(DomainError::validation("Month must be at least 1"));
        }

        Ok(Self {
            day,
            month,
            year,
            hour: 0,
            moment: 0.0,
        })
    }

    /// Create a timestamp with a known year.
    pub fn dated(day: u32, month: u32, year: i32) -> Result<Self, DomainError> {
        Self::new(day, month, Some(year))
    }

    /// Create a timestamp without a year.
    pub fn undated(day: u32, month: u32) -> Result<Self, DomainError> {
        Self::new(day, month, None)
    }

    /// Return a copy of this timestamp at the given hour and moment.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `moment` is not in `[0, 1)`.
    pub fn with_time(self, hour: u32, moment: f64) -> Result<Self, DomainError> {
        Ok(Self {
            hour,
            moment: validate_moment(moment)?,
            ..self
        })
    }

    /// Return a copy of this timestamp at the start of the given hour.
    pub fn with_hour(self, hour: u32) -> Self {
        Self {
            hour,
            moment: 0.0,
            ..self
        }
    }

    /// Return a copy of this timestamp with a different year.
    pub fn with_year(self, year: Option<i32>) -> Self {
        Self { year, ..self }
    }

    // Accessors

    /// Returns the day of the month (1-indexed).
    pub fn day(&self) -> u32 {
        self.day
    }

    /// Returns the month of the year (1-indexed).
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Returns the year, if this timestamp is dated.
    pub fn year(&self) -> Option<i32> {
        self.year
    }

    /// Returns the hour of the day.
    pub fn hour(&self) -> u32 {
        self.hour
    }

    /// Returns the fraction of the hour, in `[0, 1)`.
    pub fn moment(&self) -> f64 {
        self.moment
    }

    /// Returns true if this timestamp has a year.
    pub fn is_dated(&self) -> bool {
        self.year.is_some()
    }

    /// The ordinal day (e.g., "1st", "22nd").
    pub fn ordinal_day(&self) -> String {
        ordinal(self.day)
    }

    /// The same day at hour 0.
    pub fn date(&self) -> Self {
        Self {
            hour: 0,
            moment: 0.0,
            ..*self
        }
    }

    /// Returns true if this timestamp is strictly before `other`.
    pub fn is_before(&self, other: &Timestamp) -> bool {
        self < other
    }

    /// Returns true if this timestamp is strictly after `other`.
    pub fn is_after(&self, other: &Timestamp) -> bool {
        self > other
    }

    /// Returns true if both timestamps fall on the same day.
    pub fn same_day(&self, other: &Timestamp) -> bool {
        self.year == other.year && self.month == other.month && self.day == other.day
    }
}

fn validate_moment(moment: f64) -> Result<f64, DomainError> {
    if !(0.0..1.0).contains(&moment) {
        return Err(DomainError::validation(format!(
            "Moment must be in [0, 1), got {}",
            moment
        )));
    }
    // -0.0 passes the range check; fold it so ordering and hashing see one zero
    Ok(if moment == 0.0 { 0.0 } else { moment })
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        // Option orders None before Some, which puts undated timestamps first
        self.year
            .cmp(&other.year)
            .then(self.month.cmp(&other.month))
            .then(self.day.cmp(&other.day))
            .then(self.hour.cmp(&other.hour))
            .then(self.moment.total_cmp(&other.moment))
    }
}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Timestamp {}

impl Hash for Timestamp {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.year.hash(state);
        self.month.hash(state);
        self.day.hash(state);
        self.hour.hash(state);
        self.moment.to_bits().hash(state);
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.year {
            Some(year) => write!(f, "{}/{}/{}", self.day, self.month, year)?,
            None => write!(f, "{}/{}", self.day, self.month)?,
        }
        if self.moment > 0.0 {
            write!(f, " {}h+{:.3}", self.hour, self.moment)
        } else if self.hour > 0 {
            write!(f, " {}h", self.hour)
        } else {
            Ok(())
        }
    }
}

impl TryFrom<TimestampFields> for Timestamp {
    type Error = DomainError;

    fn try_from(fields: TimestampFields) -> Result<Self, Self::Error> {
        Self::new(fields.day, fields.month, fields.year)?.with_time(fields.hour, fields.moment)
    }
}

impl From<Timestamp> for TimestampFields {
    fn from(ts: Timestamp) -> Self {
        Self {
            day: ts.day,
            month: ts.month,
            year: ts.year,
            hour: ts.hour,
            moment: ts.moment,
        }
    }
}
