//! Era value object
//!
//! An era is a named, possibly open-ended span of a calendar's timeline with
//! its own year numbering (e.g., "1995 C.E", "D' Tar 40", "12 B.C.E").
//! The range is half-open: `start` is inside, `end` is outside.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::Timestamp;

// ============================================================================
// AffixType
// ============================================================================

/// Where an era's affix goes relative to the year number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AffixType {
    /// "D' Tar 40"
    Prefix,
    /// "1995 C.E"
    #[default]
    Suffix,
}

impl AffixType {
    pub fn display_name(&self) -> &'static str {
        match self {
            AffixType::Prefix => "Prefix",
            AffixType::Suffix => "Suffix",
        }
    }
}

impl fmt::Display for AffixType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for AffixType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "prefix" => Ok(AffixType::Prefix),
            "suffix" => Ok(AffixType::Suffix),
            other => Err(DomainError::parse(format!("Unknown affix type: {}", other))),
        }
    }
}

// ============================================================================
// YearLabel
// ============================================================================

/// A year as displayed within its era (e.g., "1995 C.E")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearLabel {
    /// The year number as counted by the era
    pub year: i64,
    /// Era affix; empty when the calendar has no eras
    pub affix: String,
    pub affix_type: AffixType,
}

impl YearLabel {
    /// A bare year number with no era affix.
    pub fn plain(year: i64) -> Self {
        Self {
            year,
            affix: String::new(),
            affix_type: AffixType::Suffix,
        }
    }
}

impl fmt::Display for YearLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.affix.is_empty() {
            return write!(f, "{}", self.year);
        }
        match self.affix_type {
            AffixType::Prefix => write!(f, "{} {}", self.affix, self.year),
            AffixType::Suffix => write!(f, "{} {}", self.year, self.affix),
        }
    }
}

// ============================================================================
// Era
// ============================================================================

/// A named span of time within a calendar type
///
/// # Invariants
///
/// - `name` is non-empty
/// - `start` and `end`, when present, are dated
/// - `start` is strictly before `end` when both are present
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EraFields", into = "EraFields")]
pub struct Era {
    name: String,
    affix: String,
    affix_type: AffixType,
    /// The year number the era's dates start with (0 A.D. vs 1 A.D.)
    starting_year: i32,
    /// Years count backward from the anchor, as in B.C.
    years_are_reversed: bool,
    start: Option<Timestamp>,
    end: Option<Timestamp>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct EraFields {
    name: String,
    #[serde(default)]
    affix: String,
    #[serde(default)]
    affix_type: AffixType,
    #[serde(default = "default_starting_year")]
    starting_year: i32,
    #[serde(default)]
    years_are_reversed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    start: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end: Option<Timestamp>,
}

fn default_starting_year() -> i32 {
    1
}

impl Era {
    /// Create a new era covering `[start, end)`.
    ///
    /// `None` for `start` means the era reaches into the unbounded past;
    /// `None` for `end` means it never ends.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if:
    /// - The name is empty after trimming
    /// - A boundary has no year
    /// - `start` is not strictly before `end`
    pub fn new(
        name: impl Into<String>,
        affix: impl Into<String>,
        start: Option<Timestamp>,
        end: Option<Timestamp>,
    ) -> Result<Self, DomainError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("Era name cannot be empty"));
        }

        for boundary in start.iter().chain(end.iter()) {
            if !boundary.is_dated() {
                return Err(DomainError::validation(format!(
                    "Era '{}' boundary {} must have a year",
                    name, boundary
                )));
            }
        }

        if let (Some(s), Some(e)) = (start, end) {
            if !s.is_before(&e) {
                return Err(DomainError::validation(format!(
                    "Era '{}' must start before it ends ({} is not before {})",
                    name, s, e
                )));
            }
        }

        Ok(Self {
            name,
            affix: affix.into().trim().to_string(),
            affix_type: AffixType::default(),
            starting_year: default_starting_year(),
            years_are_reversed: false,
            start,
            end,
        })
    }

    // Builder methods

    pub fn with_affix_type(mut self, affix_type: AffixType) -> Self {
        self.affix_type = affix_type;
        self
    }

    pub fn with_starting_year(mut self, starting_year: i32) -> Self {
        self.starting_year = starting_year;
        self
    }

    /// Count years backward from the era's anchor (B.C. style).
    pub fn with_reversed_years(mut self, reversed: bool) -> Self {
        self.years_are_reversed = reversed;
        self
    }

    // Accessors

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn affix(&self) -> &str {
        &self.affix
    }

    pub fn affix_type(&self) -> AffixType {
        self.affix_type
    }

    pub fn starting_year(&self) -> i32 {
        self.starting_year
    }

    pub fn years_are_reversed(&self) -> bool {
        self.years_are_reversed
    }

    pub fn start(&self) -> Option<&Timestamp> {
        self.start.as_ref()
    }

    pub fn end(&self) -> Option<&Timestamp> {
        self.end.as_ref()
    }

    /// Returns true if `timestamp` falls within `[start, end)`.
    pub fn contains(&self, timestamp: &Timestamp) -> bool {
        let after_start = match &self.start {
            Some(start) => !timestamp.is_before(start),
            None => true,
        };
        let before_end = match &self.end {
            Some(end) => timestamp.is_before(end),
            None => true,
        };
        after_start && before_end
    }

    /// The year era numbering counts from: the start year, or the end year
    /// for an era reaching into the unbounded past.
    pub fn year_anchor(&self) -> Option<i32> {
        self.start.or(self.end).and_then(|ts| ts.year())
    }

    /// Converts a calendar year into this era's year number.
    ///
    /// An era with neither boundary has no anchor and shows the raw year.
    pub fn display_year(&self, year: i32) -> i64 {
        let Some(anchor) = self.year_anchor() else {
            return i64::from(year);
        };
        let offset = i64::from(year) - i64::from(anchor);
        let starting = i64::from(self.starting_year);
        if self.years_are_reversed {
            offset.abs() + starting
        } else {
            offset + starting
        }
    }

    /// The display label for `year` within this era.
    pub fn label(&self, year: i32) -> YearLabel {
        YearLabel {
            year: self.display_year(year),
            affix: self.affix.clone(),
            affix_type: self.affix_type,
        }
    }
}

impl TryFrom<EraFields> for Era {
    type Error = DomainError;

    fn try_from(fields: EraFields) -> Result<Self, Self::Error> {
        Ok(Self::new(fields.name, fields.affix, fields.start, fields.end)?
            .with_affix_type(fields.affix_type)
            .with_starting_year(fields.starting_year)
            .with_reversed_years(fields.years_are_reversed))
    }
}

impl From<Era> for EraFields {
    fn from(era: Era) -> Self {
        Self {
            name: era.name,
            affix: era.affix,
            affix_type: era.affix_type,
            starting_year: era.starting_year,
            years_are_reversed: era.years_are_reversed,
            start: era.start,
            end: era.end,
        }
    }
}
