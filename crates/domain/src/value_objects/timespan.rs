//! Timespan classification for events
//!
//! `TimespanType` says how an event's stored timestamps map onto its real
//! occurrence window; `TimespanPart` says which day-slice of a decomposed
//! multi-day event a value represents.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// How an event's dates determine when it happens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimespanType {
    /// Occurs exactly at `start`; no end
    #[default]
    InitialInstant,
    /// Occupies every instant from `start` to `end`, inclusive
    EntireDuration,
    /// Occurs at one unspecified instant within `[start, end]`
    SometimeBetween,
    /// Occurs on `start`'s date at an approximate time of day (morning, evening)
    FuzzyTimeOfDay,
    /// `start` is an offset after the parent event's occurrence
    TrailingAction,
}

impl TimespanType {
    pub fn display_name(&self) -> &'static str {
        match self {
            TimespanType::InitialInstant => "Initial Instant",
            TimespanType::EntireDuration => "Entire Duration",
            TimespanType::SometimeBetween => "Sometime Between",
            TimespanType::FuzzyTimeOfDay => "Fuzzy Time of Day",
            TimespanType::TrailingAction => "Trailing Action",
        }
    }

    /// Whether events of this type carry an end timestamp.
    pub fn requires_end(&self) -> bool {
        match self {
            TimespanType::EntireDuration | TimespanType::SometimeBetween => true,
            TimespanType::InitialInstant
            | TimespanType::FuzzyTimeOfDay
            | TimespanType::TrailingAction => false,
        }
    }

    /// Whether `start` is relative to a parent event rather than absolute.
    pub fn is_relative(&self) -> bool {
        matches!(self, TimespanType::TrailingAction)
    }
}

impl fmt::Display for TimespanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for TimespanType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace([' ', '-'], "_").as_str() {
            "initial_instant" => Ok(TimespanType::InitialInstant),
            "entire_duration" => Ok(TimespanType::EntireDuration),
            "sometime_between" => Ok(TimespanType::SometimeBetween),
            "fuzzy_time_of_day" => Ok(TimespanType::FuzzyTimeOfDay),
            "trailing_action" => Ok(TimespanType::TrailingAction),
            _ => Err(DomainError::parse(format!("Unknown timespan type: {}", s))),
        }
    }
}

/// Which day-slice of a multi-day event this is; `Single` means no decomposition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimespanPart {
    #[default]
    Single,
    Beginning,
    Middle,
    End,
}

impl TimespanPart {
    pub fn display_name(&self) -> &'static str {
        match self {
            TimespanPart::Single => "Single",
            TimespanPart::Beginning => "Beginning",
            TimespanPart::Middle => "Middle",
            TimespanPart::End => "End",
        }
    }
}

impl fmt::Display for TimespanPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for TimespanPart {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(TimespanPart::Single),
            "beginning" => Ok(TimespanPart::Beginning),
            "middle" => Ok(TimespanPart::Middle),
            "end" => Ok(TimespanPart::End),
            _ => Err(DomainError::parse(format!("Unknown timespan part: {}", s))),
        }
    }
}
