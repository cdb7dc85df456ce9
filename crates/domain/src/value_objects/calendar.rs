//! Calendar type value objects
//!
//! This module provides the types that give raw `Timestamp` fields meaning for
//! arbitrary, user-defined calendars (e.g., "12th of April, 1995 C.E" or
//! "3rd of Spite, D' Tar 40").
//!
//! Key types:
//! - `Month` - A named month with a fixed day count
//! - `CalendarType` - Months, eras, epoch, hour/day constants, and the leap rule
//! - `GapPolicy` / `EraFallback` - How era coverage is checked and resolved
//!
//! # Leap days
//!
//! In a leap year the month named by `leap_date` gains one day, inserted at
//! position `leap_date.day`. Days that were numbered `leap_date.day` or later
//! in a common year move up by one, and every later day of the year moves up
//! one day-of-year position. `regular_day` maps a leap-year day back to its
//! common-year number.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::{AffixType, Era, TimeOfDay, Timestamp, YearLabel};

// ============================================================================
// Month
// ============================================================================

/// A month in a calendar type; its 1-based position is its identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MonthFields", into = "MonthFields")]
pub struct Month {
    name: String,
    number_of_days: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MonthFields {
    name: String,
    number_of_days: u32,
}

impl Month {
    /// Create a new month.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the name is empty or the month has no days.
    pub fn new(name: impl Into<String>, number_of_days: u32) -> Result<Self, DomainError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("Month name cannot be empty"));
        }
        if number_of_days == 0 {
            return Err(DomainError::validation(format!(
                "Month '{}' must have at least one day",
                name
            )));
        }
        Ok(Self {
            name,
            number_of_days,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of days in a common (non-leap) year.
    pub fn number_of_days(&self) -> u32 {
        self.number_of_days
    }
}

impl TryFrom<MonthFields> for Month {
    type Error = DomainError;

    fn try_from(fields: MonthFields) -> Result<Self, Self::Error> {
        Self::new(fields.name, fields.number_of_days)
    }
}

impl From<Month> for MonthFields {
    fn from(month: Month) -> Self {
        Self {
            name: month.name,
            number_of_days: month.number_of_days,
        }
    }
}

// ============================================================================
// Era policies
// ============================================================================

/// What to do when consecutive eras leave uncovered time between them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GapPolicy {
    /// Eras must be contiguous; a gap fails construction
    #[default]
    Reject,
    /// Gaps are accepted; lookups inside them go through `EraFallback`
    Allow,
}

/// What `resolve_era` returns for a timestamp no era contains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EraFallback {
    /// Fail with `DomainError::NoEra`
    #[default]
    Error,
    /// The latest era starting at or before the timestamp, or the first era
    /// if the timestamp precedes them all
    Nearest,
}

// ============================================================================
// CalendarType
// ============================================================================

/// A custom calendar: the structure that gives timestamps meaning
///
/// # Invariants
///
/// - At least one month; every month has at least one day
/// - `hours_in_a_day` and `minutes_in_an_hour` are positive, `hour_length` is positive and finite
/// - `epoch` is dated and valid in this calendar
/// - `leap_date` is set exactly when `leap_year_frequency > 0`
/// - Eras are in time order, never overlap, and only leave gaps under `GapPolicy::Allow`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CalendarTypeFields", into = "CalendarTypeFields")]
pub struct CalendarType {
    name: String,
    /// Phase origin of the leap-year cycle
    epoch: Timestamp,
    months: Vec<Month>,
    eras: Vec<Era>,
    /// Length of an hour relative to one Earth hour
    hour_length: f64,
    hours_in_a_day: u32,
    minutes_in_an_hour: u32,
    /// Years between leap years; 0 disables them
    leap_year_frequency: u32,
    /// Day and month of the inserted leap day; the year is ignored
    leap_date: Option<Timestamp>,
    /// "5th of March" instead of "March 5"
    uses_day_of_month_naming: bool,
    gap_policy: GapPolicy,
    era_fallback: EraFallback,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CalendarTypeFields {
    name: String,
    epoch: Timestamp,
    months: Vec<Month>,
    #[serde(default)]
    eras: Vec<Era>,
    #[serde(default = "default_hour_length")]
    hour_length: f64,
    #[serde(default = "default_hours_in_a_day")]
    hours_in_a_day: u32,
    #[serde(default = "default_minutes_in_an_hour")]
    minutes_in_an_hour: u32,
    #[serde(default)]
    leap_year_frequency: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    leap_date: Option<Timestamp>,
    #[serde(default)]
    uses_day_of_month_naming: bool,
    #[serde(default)]
    gap_policy: GapPolicy,
    #[serde(default)]
    era_fallback: EraFallback,
}

fn default_hour_length() -> f64 {
    1.0
}

fn default_hours_in_a_day() -> u32 {
    24
}

fn default_minutes_in_an_hour() -> u32 {
    60
}

/// Builder for `CalendarType`; all validation happens in `build()`.
#[derive(Debug, Clone)]
pub struct CalendarTypeBuilder {
    fields: CalendarTypeFields,
}

impl CalendarTypeBuilder {
    pub fn eras(mut self, eras: Vec<Era>) -> Self {
        self.fields.eras = eras;
        self
    }

    pub fn hour_length(mut self, hour_length: f64) -> Self {
        self.fields.hour_length = hour_length;
        self
    }

    pub fn hours_in_a_day(mut self, hours: u32) -> Self {
        self.fields.hours_in_a_day = hours;
        self
    }

    pub fn minutes_in_an_hour(mut self, minutes: u32) -> Self {
        self.fields.minutes_in_an_hour = minutes;
        self
    }

    /// Enable leap years every `frequency` years, inserting a day at `leap_date`.
    pub fn leap_years(mut self, frequency: u32, leap_date: Timestamp) -> Self {
        self.fields.leap_year_frequency = frequency;
        self.fields.leap_date = Some(leap_date);
        self
    }

    pub fn day_of_month_naming(mut self, enabled: bool) -> Self {
        self.fields.uses_day_of_month_naming = enabled;
        self
    }

    pub fn gap_policy(mut self, policy: GapPolicy) -> Self {
        self.fields.gap_policy = policy;
        self
    }

    pub fn era_fallback(mut self, fallback: EraFallback) -> Self {
        self.fields.era_fallback = fallback;
        self
    }

    /// Validate the configuration and build the calendar type.
    ///
    /// # Errors
    ///
    /// - `DomainError::Validation` for empty names or month lists, non-positive
    ///   constants, an undated epoch, or a leap rule missing half its configuration
    /// - `DomainError::OutOfRange` for an epoch, leap date, or era boundary that
    ///   does not exist in this calendar
    /// - `DomainError::Overlap` for overlapping eras, or gaps under `GapPolicy::Reject`
    pub fn build(self) -> Result<CalendarType, DomainError> {
        let f = self.fields;
        let name = f.name.trim().to_string();

        if name.is_empty() {
            return Err(DomainError::validation("Calendar type name cannot be empty"));
        }
        if f.months.is_empty() {
            return Err(DomainError::validation(format!(
                "Calendar type '{}' needs at least one month",
                name
            )));
        }
        if f.hours_in_a_day == 0 {
            return Err(DomainError::validation(format!(
                "Calendar type '{}' must have at least one hour in a day",
                name
            )));
        }
        if f.minutes_in_an_hour == 0 {
            return Err(DomainError::validation(format!(
                "Calendar type '{}' must have at least one minute in an hour",
                name
            )));
        }
        if !(f.hour_length.is_finite() && f.hour_length > 0.0) {
            return Err(DomainError::validation(format!(
                "Calendar type '{}' hour length must be positive, got {}",
                name, f.hour_length
            )));
        }
        if !f.epoch.is_dated() {
            return Err(DomainError::validation(format!(
                "Calendar type '{}' epoch must have a year",
                name
            )));
        }
        match (f.leap_year_frequency, &f.leap_date) {
            (0, Some(_)) => {
                return Err(DomainError::validation(format!(
                    "Calendar type '{}' has a leap date but no leap year frequency",
                    name
                )));
            }
            (frequency, None) if frequency > 0 => {
                return Err(DomainError::validation(format!(
                    "Calendar type '{}' has leap years but no leap date",
                    name
                )));
            }
            _ => {}
        }

        // Every day count below is bounded by the length of a leap year
        let leap_days = u64::from(f.leap_date.is_some());
        let fits = f
            .months
            .iter()
            .try_fold(leap_days, |total, month| {
                total.checked_add(u64::from(month.number_of_days()))
            })
            .is_some_and(|total| total <= u64::from(u32::MAX));
        if !fits {
            return Err(DomainError::out_of_range(format!(
                "Calendar type '{}' has more than {} days in a year",
                name,
                u32::MAX
            )));
        }

        let calendar = CalendarType {
            name,
            epoch: f.epoch,
            months: f.months,
            eras: f.eras,
            hour_length: f.hour_length,
            hours_in_a_day: f.hours_in_a_day,
            minutes_in_an_hour: f.minutes_in_an_hour,
            leap_year_frequency: f.leap_year_frequency,
            leap_date: f.leap_date,
            uses_day_of_month_naming: f.uses_day_of_month_naming,
            gap_policy: f.gap_policy,
            era_fallback: f.era_fallback,
        };

        if let Some(leap) = &calendar.leap_date {
            let month = calendar.month(leap.month())?;
            if leap.day() > month.number_of_days() + 1 {
                return Err(DomainError::out_of_range(format!(
                    "Leap day {} cannot be inserted into {} ({} days)",
                    leap.day(),
                    month.name(),
                    month.number_of_days()
                )));
            }
        }
        calendar.validate_timestamp(&calendar.epoch)?;
        calendar.validate_eras()?;

        tracing::debug!(
            calendar = %calendar.name,
            months = calendar.months.len(),
            eras = calendar.eras.len(),
            leap_year_frequency = calendar.leap_year_frequency,
            "Calendar type configured"
        );

        Ok(calendar)
    }
}

impl CalendarType {
    /// Start building a calendar type.
    ///
    /// Defaults: Earth-length hours, 24 hours a day, 60 minutes an hour, no
    /// leap years, no eras, "Month 5" naming, gaps rejected, no era fallback.
    pub fn builder(
        name: impl Into<String>,
        epoch: Timestamp,
        months: Vec<Month>,
    ) -> CalendarTypeBuilder {
        CalendarTypeBuilder {
            fields: CalendarTypeFields {
                name: name.into(),
                epoch,
                months,
                eras: Vec::new(),
                hour_length: default_hour_length(),
                hours_in_a_day: default_hours_in_a_day(),
                minutes_in_an_hour: default_minutes_in_an_hour(),
                leap_year_frequency: 0,
                leap_date: None,
                uses_day_of_month_naming: false,
                gap_policy: GapPolicy::default(),
                era_fallback: EraFallback::default(),
            },
        }
    }

    fn validate_eras(&self) -> Result<(), DomainError> {
        for era in &self.eras {
            for boundary in era.start().into_iter().chain(era.end()) {
                self.validate_timestamp(boundary).map_err(|e| {
                    DomainError::out_of_range(format!("Era '{}' boundary: {}", era.name(), e))
                })?;
            }
        }

        for pair in self.eras.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            let (Some(prev_end), Some(next_start)) = (prev.end(), next.start()) else {
                return Err(DomainError::overlap(format!(
                    "'{}' and '{}' are open-ended towards each other",
                    prev.name(),
                    next.name()
                )));
            };

            if next_start.is_before(prev_end) {
                return Err(DomainError::overlap(format!(
                    "'{}' starts at {} before '{}' ends at {}",
                    next.name(),
                    next_start,
                    prev.name(),
                    prev_end
                )));
            }
            if prev_end.is_before(next_start) {
                match self.gap_policy {
                    GapPolicy::Reject => {
                        return Err(DomainError::overlap(format!(
                            "gap between '{}' (ends {}) and '{}' (starts {})",
                            prev.name(),
                            prev_end,
                            next.name(),
                            next_start
                        )));
                    }
                    GapPolicy::Allow => {
                        tracing::debug!(
                            calendar = %self.name,
                            before = prev.name(),
                            after = next.name(),
                            "Era gap allowed"
                        );
                    }
                }
            }
        }

        Ok(())
    }

    // Accessors

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn epoch(&self) -> &Timestamp {
        &self.epoch
    }

    pub fn months(&self) -> &[Month] {
        &self.months
    }

    pub fn eras(&self) -> &[Era] {
        &self.eras
    }

    pub fn hour_length(&self) -> f64 {
        self.hour_length
    }

    pub fn hours_in_a_day(&self) -> u32 {
        self.hours_in_a_day
    }

    pub fn minutes_in_an_hour(&self) -> u32 {
        self.minutes_in_an_hour
    }

    pub fn leap_year_frequency(&self) -> u32 {
        self.leap_year_frequency
    }

    pub fn leap_date(&self) -> Option<&Timestamp> {
        self.leap_date.as_ref()
    }

    pub fn uses_day_of_month_naming(&self) -> bool {
        self.uses_day_of_month_naming
    }

    pub fn gap_policy(&self) -> GapPolicy {
        self.gap_policy
    }

    pub fn era_fallback(&self) -> EraFallback {
        self.era_fallback
    }

    // Months

    /// Returns the number of months in a year.
    pub fn month_count(&self) -> u32 {
        u32::try_from(self.months.len()).unwrap_or(u32::MAX)
    }

    /// Looks up a month by its 1-based index.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::OutOfRange` if `index` is outside `1..=month_count()`.
    pub fn month(&self, index: u32) -> Result<&Month, DomainError> {
        index
            .checked_sub(1)
            .and_then(|i| self.months.get(i as usize))
            .ok_or_else(|| {
                DomainError::out_of_range(format!(
                    "Month {} is outside 1..={} in calendar '{}'",
                    index,
                    self.months.len(),
                    self.name
                ))
            })
    }

    /// Looks up the month a timestamp falls in.
    pub fn month_of(&self, timestamp: &Timestamp) -> Result<&Month, DomainError> {
        self.month(timestamp.month())
    }

    // Leap years

    /// Returns true if `year` is a leap year: leap years are enabled and the
    /// year is a whole number of cycles away from the epoch year.
    pub fn is_leap_year(&self, year: i32) -> bool {
        if self.leap_year_frequency == 0 {
            return false;
        }
        let epoch_year = self.epoch.year().unwrap_or_default();
        (i64::from(year) - i64::from(epoch_year)).rem_euclid(i64::from(self.leap_year_frequency))
            == 0
    }

    /// Whether the leap day is inserted into `month` of `year`. Undated
    /// timestamps are read as falling in a common year.
    fn gains_leap_day(&self, year: Option<i32>, month: u32) -> bool {
        match (year, &self.leap_date) {
            (Some(year), Some(leap)) => leap.month() == month && self.is_leap_year(year),
            _ => false,
        }
    }

    /// Number of days in `month` of `year`, counting an inserted leap day.
    pub fn days_in_month(&self, year: Option<i32>, month: u32) -> Result<u32, DomainError> {
        let base = self.month(month)?.number_of_days();
        Ok(if self.gains_leap_day(year, month) {
            base + 1
        } else {
            base
        })
    }

    /// Number of days in `year`, counting an inserted leap day.
    pub fn days_in_year(&self, year: Option<i32>) -> u32 {
        let common: u32 = self.months.iter().map(Month::number_of_days).sum();
        match year {
            Some(year) if self.leap_date.is_some() && self.is_leap_year(year) => common + 1,
            _ => common,
        }
    }

    /// Returns true if the timestamp falls on an inserted leap day.
    pub fn is_leap_day(&self, timestamp: &Timestamp) -> bool {
        self.leap_date
            .is_some_and(|leap| leap.day() == timestamp.day())
            && self.gains_leap_day(timestamp.year(), timestamp.month())
    }

    /// The day's number in common-year reckoning: days after the inserted
    /// leap day shift back by one; the leap day itself has no common number.
    pub fn regular_day(&self, timestamp: &Timestamp) -> Option<u32> {
        let day = timestamp.day();
        match &self.leap_date {
            Some(leap) if self.gains_leap_day(timestamp.year(), timestamp.month()) => {
                match day.cmp(&leap.day()) {
                    std::cmp::Ordering::Less => Some(day),
                    std::cmp::Ordering::Equal => None,
                    std::cmp::Ordering::Greater => Some(day - 1),
                }
            }
            _ => Some(day),
        }
    }

    // Strict validation

    /// Checks a timestamp against this calendar's structure.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::OutOfRange` if the month does not exist, the day
    /// exceeds that month's length in that year, or the hour exceeds the day.
    pub fn validate_timestamp(&self, timestamp: &Timestamp) -> Result<(), DomainError> {
        let days = self.days_in_month(timestamp.year(), timestamp.month())?;
        if timestamp.day() > days {
            return Err(DomainError::out_of_range(format!(
                "Day {} exceeds the {} days of {} in {}",
                timestamp.day(),
                days,
                self.month_of(timestamp)?.name(),
                timestamp
                    .year()
                    .map_or_else(|| "an undated year".to_string(), |y| format!("year {}", y))
            )));
        }
        if timestamp.hour() >= self.hours_in_a_day {
            return Err(DomainError::out_of_range(format!(
                "Hour {} is outside a {}-hour day",
                timestamp.hour(),
                self.hours_in_a_day
            )));
        }
        Ok(())
    }

    /// Create a timestamp that is valid in this calendar.
    pub fn timestamp(
        &self,
        day: u32,
        month: u32,
        year: Option<i32>,
    ) -> Result<Timestamp, DomainError> {
        let timestamp = Timestamp::new(day, month, year)?;
        self.validate_timestamp(&timestamp)?;
        Ok(timestamp)
    }

    // Day arithmetic

    /// 1-based position of the timestamp's day within its year.
    pub fn day_of_year(&self, timestamp: &Timestamp) -> Result<u32, DomainError> {
        self.validate_timestamp(timestamp)?;
        let mut total = 0;
        for month in 1..timestamp.month() {
            total += self.days_in_month(timestamp.year(), month)?;
        }
        Ok(total + timestamp.day())
    }

    /// The date at 1-based position `ordinal` within `year`.
    pub fn date_from_day_of_year(
        &self,
        year: Option<i32>,
        ordinal: u32,
    ) -> Result<Timestamp, DomainError> {
        let days_in_year = self.days_in_year(year);
        if ordinal == 0 || ordinal > days_in_year {
            return Err(DomainError::out_of_range(format!(
                "Day {} of the year is outside 1..={}",
                ordinal, days_in_year
            )));
        }

        let mut remaining = ordinal;
        for month in 1..=self.month_count() {
            let days = self.days_in_month(year, month)?;
            if remaining <= days {
                return Timestamp::new(remaining, month, year);
            }
            remaining -= days;
        }

        Err(DomainError::out_of_range(format!(
            "Day {} of the year is past the last month",
            ordinal
        )))
    }

    /// Moves a timestamp forward by whole days, keeping its time of day.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::OutOfRange` if an undated timestamp would cross
    /// into another year, or the year overflows.
    pub fn advance_days(&self, timestamp: &Timestamp, days: u64) -> Result<Timestamp, DomainError> {
        let mut year = timestamp.year();
        let mut ordinal = u64::from(self.day_of_year(timestamp)?) + days;

        loop {
            let length = u64::from(self.days_in_year(year));
            if ordinal <= length {
                break;
            }
            let Some(current) = year else {
                return Err(DomainError::out_of_range(format!(
                    "Cannot move undated {} across a year boundary",
                    timestamp
                )));
            };
            ordinal -= length;
            year = Some(
                current
                    .checked_add(1)
                    .ok_or_else(|| DomainError::out_of_range("Year overflow"))?,
            );
        }

        let ordinal = u32::try_from(ordinal)
            .map_err(|_| DomainError::out_of_range("Day of year overflow"))?;
        self.date_from_day_of_year(year, ordinal)?
            .with_time(timestamp.hour(), timestamp.moment())
    }

    /// The following day, at the same time.
    pub fn next_day(&self, timestamp: &Timestamp) -> Result<Timestamp, DomainError> {
        self.advance_days(timestamp, 1)
    }

    /// Moves a timestamp forward by `hours` whole hours and `moment` of an hour,
    /// carrying into following days.
    pub fn advance_hours(
        &self,
        timestamp: &Timestamp,
        hours: u64,
        moment: f64,
    ) -> Result<Timestamp, DomainError> {
        if !(0.0..1.0).contains(&moment) {
            return Err(DomainError::validation(format!(
                "Moment must be in [0, 1), got {}",
                moment
            )));
        }
        self.validate_timestamp(timestamp)?;

        let mut total_moment = timestamp.moment() + moment;
        let mut total_hours = u64::from(timestamp.hour()) + hours;
        if total_moment >= 1.0 {
            total_moment -= 1.0;
            total_hours += 1;
        }

        let hours_per_day = u64::from(self.hours_in_a_day);
        let hour = (total_hours % hours_per_day) as u32;
        self.advance_days(&timestamp.date(), total_hours / hours_per_day)?
            .with_time(hour, total_moment)
    }

    /// Moves `anchor` forward by the span an offset timestamp describes.
    ///
    /// The offset reads as: `year` whole years (none = 0), then
    /// `day_of_year - 1` days counted in a common year, then `hour` hours
    /// (may exceed a day) and `moment` of an hour. A year shift that lands on a
    /// day the target month lacks is clamped to the month's last day.
    pub fn offset_by(
        &self,
        anchor: &Timestamp,
        offset: &Timestamp,
    ) -> Result<Timestamp, DomainError> {
        let years = offset.year().unwrap_or(0);
        if years < 0 {
            return Err(DomainError::validation(format!(
                "Offset {} cannot move backward",
                offset
            )));
        }

        let mut base = *anchor;
        if years != 0 {
            let Some(year) = anchor.year() else {
                return Err(DomainError::validation(format!(
                    "Cannot shift undated {} by {} years",
                    anchor, years
                )));
            };
            let target = year
                .checked_add(years)
                .ok_or_else(|| DomainError::out_of_range("Year overflow"))?;
            let last_day = self.days_in_month(Some(target), anchor.month())?;
            base = Timestamp::new(anchor.day().min(last_day), anchor.month(), Some(target))?
                .with_time(anchor.hour(), anchor.moment())?;
        }

        let days = self.day_of_year(&offset.with_year(None).date())? - 1;
        let moved = self.advance_days(&base, u64::from(days))?;
        self.advance_hours(&moved, u64::from(offset.hour()), offset.moment())
    }

    // Eras

    /// Finds the era a timestamp falls in.
    ///
    /// Eras are scanned in order and the first whose `[start, end)` range
    /// contains the timestamp wins. Uncovered timestamps go through the
    /// calendar's `EraFallback`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NoEra` if no era covers the timestamp and the
    /// fallback is `EraFallback::Error`, or if the calendar has no eras.
    pub fn resolve_era(&self, timestamp: &Timestamp) -> Result<&Era, DomainError> {
        if let Some(era) = self.eras.iter().find(|era| era.contains(timestamp)) {
            return Ok(era);
        }

        let no_era = || DomainError::no_era(format!("{} in calendar '{}'", timestamp, self.name));
        match self.era_fallback {
            EraFallback::Error => Err(no_era()),
            EraFallback::Nearest => {
                let nearest = self
                    .eras
                    .iter()
                    .rev()
                    .find(|era| era.start().is_some_and(|start| !timestamp.is_before(start)))
                    .or_else(|| self.eras.first())
                    .ok_or_else(no_era)?;
                tracing::debug!(
                    calendar = %self.name,
                    timestamp = %timestamp,
                    era = nearest.name(),
                    "No era contains timestamp, using nearest"
                );
                Ok(nearest)
            }
        }
    }

    /// The era-relative year label for a timestamp, or `None` if it is undated.
    ///
    /// Calendars without eras label years with the bare year number.
    pub fn year_label(&self, timestamp: &Timestamp) -> Result<Option<YearLabel>, DomainError> {
        let Some(year) = timestamp.year() else {
            return Ok(None);
        };
        if self.eras.is_empty() {
            return Ok(Some(YearLabel::plain(i64::from(year))));
        }
        Ok(Some(self.resolve_era(timestamp)?.label(year)))
    }

    /// Formats the year with its era affix (e.g., "1995 C.E").
    pub fn format_year(&self, timestamp: &Timestamp) -> Result<Option<String>, DomainError> {
        Ok(self.year_label(timestamp)?.map(|label| label.to_string()))
    }

    /// Formats the date: "12th of April, 1995 C.E" with day-of-month naming,
    /// "April 12, 1995 C.E" without. Undated timestamps omit the year.
    pub fn format_date(&self, timestamp: &Timestamp) -> Result<String, DomainError> {
        let month = self.month_of(timestamp)?;
        let day = if self.uses_day_of_month_naming {
            format!("{} of {}", timestamp.ordinal_day(), month.name())
        } else {
            format!("{} {}", month.name(), timestamp.day())
        };

        Ok(match self.year_label(timestamp)? {
            Some(label) => format!("{}, {}", day, label),
            None => day,
        })
    }

    // Time of day

    /// The minute within the hour, from the timestamp's moment.
    pub fn minute_of_hour(&self, timestamp: &Timestamp) -> u32 {
        let minute = (timestamp.moment() * f64::from(self.minutes_in_an_hour)).floor() as u32;
        minute.min(self.minutes_in_an_hour - 1)
    }

    /// Formats the time of day as "H:MM".
    pub fn format_time(&self, timestamp: &Timestamp) -> String {
        format!("{}:{:02}", timestamp.hour(), self.minute_of_hour(timestamp))
    }

    /// The coarse period of the day, scaled to this calendar's day length.
    pub fn time_of_day(&self, timestamp: &Timestamp) -> TimeOfDay {
        let position = f64::from(timestamp.hour()) + timestamp.moment();
        TimeOfDay::from_day_fraction(position / f64::from(self.hours_in_a_day))
    }

    /// Length of one day in Earth hours.
    pub fn earth_hours_per_day(&self) -> f64 {
        self.hour_length * f64::from(self.hours_in_a_day)
    }

    // Built-in calendars

    /// The "Human" calendar.
    ///
    /// - Gregorian months, 24 Earth-length hours
    /// - Leap day on February 20th every 4 years, phased from the 21970 epoch
    /// - Eras: "Before The Common Era" (counting back, year 19999 is 1 B.C.E)
    ///   and "Common Era" from year 20000 (year 20000 is 1 C.E)
    pub fn human() -> Self {
        let date = |day, month, year| {
            Timestamp::dated(day, month, year).expect("built-in dates are valid")
        };
        let month = |name: &str, days: u32| Month::new(name, days).expect("built-in months are valid");

        let eras = vec![
            Era::new("Before The Common Era", "B.C.E", None, Some(date(1, 1, 20000)))
                .expect("built-in eras are valid")
                .with_reversed_years(true)
                .with_starting_year(0),
            Era::new("Common Era", "C.E", Some(date(1, 1, 20000)), None)
                .expect("built-in eras are valid"),
        ];

        Self::builder(
            "Human",
            date(1, 1, 21970),
            vec![
                month("January", 31),
                month("February", 28),
                month("March", 31),
                month("April", 30),
                month("May", 31),
                month("June", 30),
                month("July", 31),
                month("August", 31),
                month("September", 30),
                month("October", 31),
                month("November", 30),
                month("December", 31),
            ],
        )
        .eras(eras)
        .leap_years(4, date(20, 2, 21972))
        .build()
        .expect("the Human calendar is valid")
    }

    /// The "Tantar" calendar.
    ///
    /// - 12 months of 24 days each
    /// - 12 hours a day, each 1.2 Earth hours long
    /// - "Xth of Month" naming, no leap years
    /// - Six ages, from "The Beginning" to "Our Age" (year 11168 onward)
    pub fn tantar() -> Self {
        let date = |year: i32| Timestamp::dated(1, 1, year).expect("built-in dates are valid");
        let era = |name: &str, affix: &str, start: Option<Timestamp>, end: Option<Timestamp>| {
            Era::new(name, affix, start, end)
                .expect("built-in eras are valid")
                .with_affix_type(AffixType::Prefix)
        };

        let first_age = Timestamp::dated(7, 1, 1).expect("built-in dates are valid");
        let eras = vec![
            Era::new("The Beginning", "'D Ral", None, Some(first_age))
                .expect("built-in eras are valid")
                .with_reversed_years(true)
                .with_starting_year(0),
            era("The Age Of Gold", "D' Korr^o", Some(first_age), Some(date(3))),
            era("The Age Of Reclamation", "D' KyaM^i", Some(date(3)), Some(date(903))),
            era("The Age of Darkness", "D' Ul", Some(date(903)), Some(date(7568))),
            era("The Age of Gods", "D' R^ael", Some(date(7568)), Some(date(11168))),
            era("Our Age", "D' Tar", Some(date(11168)), None),
        ];

        let months = [
            "New Summer",
            "Old Summer",
            "The Gentle Season",
            "Stormy Skies",
            "The Misty Season",
            "Preparation",
            "Gathering Season",
            "Spite",
            "Reclamation",
            "New Spring",
            "Old Spring",
            "Smoldering",
        ]
        .into_iter()
        .map(|name| Month::new(name, 24).expect("built-in months are valid"))
        .collect();

        Self::builder("Tantar", date(20000), months)
            .eras(eras)
            .hour_length(1.2)
            .hours_in_a_day(12)
            .day_of_month_naming(true)
            .build()
            .expect("the Tantar calendar is valid")
    }
}

impl TryFrom<CalendarTypeFields> for CalendarType {
    type Error = DomainError;

    fn try_from(fields: CalendarTypeFields) -> Result<Self, Self::Error> {
        CalendarTypeBuilder { fields }.build()
    }
}

impl From<CalendarType> for CalendarTypeFields {
    fn from(calendar: CalendarType) -> Self {
        Self {
            name: calendar.name,
            epoch: calendar.epoch,
            months: calendar.months,
            eras: calendar.eras,
            hour_length: calendar.hour_length,
            hours_in_a_day: calendar.hours_in_a_day,
            minutes_in_an_hour: calendar.minutes_in_an_hour,
            leap_year_frequency: calendar.leap_year_frequency,
            leap_date: calendar.leap_date,
            uses_day_of_month_naming: calendar.uses_day_of_month_naming,
            gap_policy: calendar.gap_policy,
            era_fallback: calendar.era_fallback,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32, month: u32, year: i32) -> Timestamp {
        Timestamp::dated(day, month, year).unwrap()
    }

    fn three_months() -> Vec<Month> {
        vec![
            Month::new("Thaw", 10).unwrap(),
            Month::new("Bloom", 12).unwrap(),
            Month::new("Frost", 8).unwrap(),
        ]
    }

    fn era(name: &str, start: Option<i32>, end: Option<i32>) -> Era {
        Era::new(name, name, start.map(|y| date(1, 1, y)), end.map(|y| date(1, 1, y))).unwrap()
    }

    mod month {
        use super::*;

        #[test]
        fn zero_days_rejected() {
            let err = Month::new("Void", 0).unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)));
        }

        #[test]
        fn empty_name_rejected() {
            assert!(Month::new(" ", 30).is_err());
        }

        #[test]
        fn lookup_is_one_based() {
            let calendar = CalendarType::human();
            assert_eq!(calendar.month(1).unwrap().name(), "January");
            assert_eq!(calendar.month(12).unwrap().name(), "December");
        }

        #[test]
        fn lookup_outside_range_fails() {
            let calendar = CalendarType::human();
            assert!(matches!(
                calendar.month(0).unwrap_err(),
                DomainError::OutOfRange(_)
            ));
            assert!(matches!(
                calendar.month(13).unwrap_err(),
                DomainError::OutOfRange(_)
            ));
        }
    }

    mod construction {
        use super::*;

        #[test]
        fn defaults() {
            let calendar = CalendarType::builder("Simple", date(1, 1, 1), three_months())
                .build()
                .unwrap();
            assert_eq!(calendar.hours_in_a_day(), 24);
            assert_eq!(calendar.minutes_in_an_hour(), 60);
            assert_eq!(calendar.hour_length(), 1.0);
            assert_eq!(calendar.leap_year_frequency(), 0);
            assert!(calendar.leap_date().is_none());
            assert!(calendar.eras().is_empty());
            assert_eq!(calendar.gap_policy(), GapPolicy::Reject);
            assert_eq!(calendar.era_fallback(), EraFallback::Error);
        }

        #[test]
        fn empty_months_rejected() {
            let err = CalendarType::builder("Empty", date(1, 1, 1), vec![])
                .build()
                .unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)));
            assert!(err.to_string().contains("at least one month"));
        }

        #[test]
        fn non_positive_constants_rejected() {
            let base = || CalendarType::builder("C", date(1, 1, 1), three_months());
            assert!(base().hours_in_a_day(0).build().is_err());
            assert!(base().minutes_in_an_hour(0).build().is_err());
            assert!(base().hour_length(0.0).build().is_err());
            assert!(base().hour_length(f64::INFINITY).build().is_err());
        }

        #[test]
        fn undated_epoch_rejected() {
            let err = CalendarType::builder("C", Timestamp::undated(1, 1).unwrap(), three_months())
                .build()
                .unwrap_err();
            assert!(err.to_string().contains("epoch"));
        }

        #[test]
        fn epoch_outside_months_rejected() {
            let err = CalendarType::builder("C", date(11, 1, 1), three_months())
                .build()
                .unwrap_err();
            assert!(matches!(err, DomainError::OutOfRange(_)));
        }

        #[test]
        fn leap_rule_needs_both_halves() {
            let mut fields = CalendarType::builder("C", date(1, 1, 1), three_months()).fields;
            fields.leap_year_frequency = 4;
            assert!(CalendarTypeBuilder { fields }.build().is_err());

            let err = CalendarType::builder("C", date(1, 1, 1), three_months())
                .leap_years(0, date(3, 2, 1))
                .build()
                .unwrap_err();
            assert!(err.to_string().contains("no leap year frequency"));
        }

        #[test]
        fn leap_date_must_fit_its_month() {
            let err = CalendarType::builder("C", date(1, 1, 1), three_months())
                .leap_years(4, date(10, 3, 1))
                .build()
                .unwrap_err();
            assert!(matches!(err, DomainError::OutOfRange(_)));

            // Appending a day at the very end of the month is allowed
            assert!(CalendarType::builder("C", date(1, 1, 1), three_months())
                .leap_years(4, date(9, 3, 1))
                .build()
                .is_ok());
        }

        #[test]
        fn year_length_must_fit_a_day_count() {
            let longest = || Month::new("Long", u32::MAX).unwrap();

            let err = CalendarType::builder("C", date(1, 1, 1), vec![longest()])
                .leap_years(4, date(1, 1, 1))
                .build()
                .unwrap_err();
            assert!(matches!(err, DomainError::OutOfRange(_)));

            let err = CalendarType::builder(
                "C",
                date(1, 1, 1),
                vec![longest(), Month::new("Short", 2).unwrap()],
            )
            .build()
            .unwrap_err();
            assert!(matches!(err, DomainError::OutOfRange(_)));

            let calendar = CalendarType::builder("C", date(1, 1, 1), vec![longest()])
                .build()
                .unwrap();
            assert_eq!(calendar.days_in_year(Some(1)), u32::MAX);
            assert_eq!(
                calendar.day_of_year(&date(u32::MAX, 1, 1)).unwrap(),
                u32::MAX
            );
        }

        #[test]
        fn builtins_are_valid() {
            let human = CalendarType::human();
            assert_eq!(human.months().len(), 12);
            assert_eq!(human.days_in_year(Some(21971)), 365);

            let tantar = CalendarType::tantar();
            assert_eq!(tantar.days_in_year(Some(20000)), 288);
            assert_eq!(tantar.eras().len(), 6);
            assert!((tantar.earth_hours_per_day() - 14.4).abs() < 1e-9);
        }
    }

    mod era_layout {
        use super::*;

        fn build(eras: Vec<Era>, policy: GapPolicy) -> Result<CalendarType, DomainError> {
            CalendarType::builder("C", date(1, 1, 1), three_months())
                .eras(eras)
                .gap_policy(policy)
                .build()
        }

        #[test]
        fn contiguous_eras_accepted() {
            let eras = vec![
                era("Old", None, Some(10)),
                era("Middle", Some(10), Some(20)),
                era("New", Some(20), None),
            ];
            assert!(build(eras, GapPolicy::Reject).is_ok());
        }

        #[test]
        fn overlap_rejected() {
            let eras = vec![era("Old", None, Some(15)), era("New", Some(10), None)];
            let err = build(eras, GapPolicy::Allow).unwrap_err();
            assert!(matches!(err, DomainError::Overlap(_)));
            assert!(err.to_string().contains("before 'Old' ends"));
        }

        #[test]
        fn open_ended_middle_rejected() {
            let eras = vec![era("Forever", Some(1), None), era("Later", Some(10), None)];
            assert!(matches!(
                build(eras, GapPolicy::Allow).unwrap_err(),
                DomainError::Overlap(_)
            ));
        }

        #[test]
        fn gap_follows_policy() {
            let eras = || vec![era("Old", None, Some(10)), era("New", Some(12), None)];
            let err = build(eras(), GapPolicy::Reject).unwrap_err();
            assert!(err.to_string().contains("gap between"));
            assert!(build(eras(), GapPolicy::Allow).is_ok());
        }

        #[test]
        fn era_boundary_must_exist_in_calendar() {
            let bad = Era::new("Odd", "O", Some(date(5, 4, 10)), None).unwrap();
            let err = build(vec![bad], GapPolicy::Reject).unwrap_err();
            assert!(matches!(err, DomainError::OutOfRange(_)));
        }
    }

    mod leap_years {
        use super::*;

        #[test]
        fn frequency_is_phased_from_epoch() {
            let calendar = CalendarType::human();
            for year in [21970, 21974, 21978, 21966] {
                assert!(calendar.is_leap_year(year), "{} should be a leap year", year);
            }
            for year in [21971, 21972, 21973] {
                assert!(!calendar.is_leap_year(year), "{} should not be a leap year", year);
            }
        }

        #[test]
        fn zero_frequency_disables() {
            let calendar = CalendarType::tantar();
            assert!(!calendar.is_leap_year(20000));
        }

        #[test]
        fn leap_month_gains_a_day() {
            let calendar = CalendarType::human();
            assert_eq!(calendar.days_in_month(Some(21974), 2).unwrap(), 29);
            assert_eq!(calendar.days_in_month(Some(21975), 2).unwrap(), 28);
            assert_eq!(calendar.days_in_month(Some(21974), 3).unwrap(), 31);
            assert_eq!(calendar.days_in_month(None, 2).unwrap(), 28);
            assert_eq!(calendar.days_in_year(Some(21974)), 366);
        }

        #[test]
        fn day_29_only_exists_in_leap_years() {
            let calendar = CalendarType::human();
            assert!(calendar.timestamp(29, 2, Some(21974)).is_ok());
            let err = calendar.timestamp(29, 2, Some(21975)).unwrap_err();
            assert!(matches!(err, DomainError::OutOfRange(_)));
        }

        #[test]
        fn inserted_day_shifts_later_days() {
            let calendar = CalendarType::human();
            let leap_day = date(20, 2, 21974);
            assert!(calendar.is_leap_day(&leap_day));
            assert!(!calendar.is_leap_day(&date(20, 2, 21975)));

            assert_eq!(calendar.regular_day(&date(19, 2, 21974)), Some(19));
            assert_eq!(calendar.regular_day(&leap_day), None);
            assert_eq!(calendar.regular_day(&date(21, 2, 21974)), Some(20));
            assert_eq!(calendar.regular_day(&date(21, 2, 21975)), Some(21));

            // March 1st moves one position later in a leap year
            assert_eq!(calendar.day_of_year(&date(1, 3, 21975)).unwrap(), 60);
            assert_eq!(calendar.day_of_year(&date(1, 3, 21974)).unwrap(), 61);
        }

        #[test]
        fn day_of_year_inverse() {
            let calendar = CalendarType::human();
            assert_eq!(
                calendar.date_from_day_of_year(Some(21974), 51).unwrap(),
                date(20, 2, 21974)
            );
            assert_eq!(
                calendar.date_from_day_of_year(Some(21974), 366).unwrap(),
                date(31, 12, 21974)
            );
            assert!(calendar.date_from_day_of_year(Some(21975), 366).is_err());
            assert!(calendar.date_from_day_of_year(Some(21975), 0).is_err());
        }
    }

    mod arithmetic {
        use super::*;

        #[test]
        fn next_day_rolls_months_and_years() {
            let calendar = CalendarType::human();
            assert_eq!(calendar.next_day(&date(28, 2, 21975)).unwrap(), date(1, 3, 21975));
            assert_eq!(calendar.next_day(&date(28, 2, 21974)).unwrap(), date(29, 2, 21974));
            assert_eq!(calendar.next_day(&date(31, 12, 21975)).unwrap(), date(1, 1, 21976));
        }

        #[test]
        fn advance_days_spans_leap_years() {
            let calendar = CalendarType::human();
            // 21974 is a leap year: 366 days later is the same date
            assert_eq!(
                calendar.advance_days(&date(1, 1, 21974), 366).unwrap(),
                date(1, 1, 21975)
            );
            assert_eq!(
                calendar.advance_days(&date(1, 1, 21975), 365).unwrap(),
                date(1, 1, 21976)
            );
        }

        #[test]
        fn advance_keeps_time_of_day() {
            let calendar = CalendarType::human();
            let start = date(1, 1, 21975).with_time(7, 0.5).unwrap();
            let moved = calendar.advance_days(&start, 2).unwrap();
            assert_eq!(moved, date(3, 1, 21975).with_time(7, 0.5).unwrap());
        }

        #[test]
        fn undated_cannot_cross_year_end() {
            let calendar = CalendarType::human();
            let undated = Timestamp::undated(31, 12).unwrap();
            let err = calendar.next_day(&undated).unwrap_err();
            assert!(matches!(err, DomainError::OutOfRange(_)));
            assert!(calendar.next_day(&Timestamp::undated(30, 12).unwrap()).is_ok());
        }

        #[test]
        fn advance_hours_carries_into_days() {
            let calendar = CalendarType::tantar();
            let start = date(24, 12, 20000).with_time(11, 0.75).unwrap();
            let moved = calendar.advance_hours(&start, 1, 0.5).unwrap();
            assert_eq!(moved, date(1, 1, 20001).with_time(1, 0.25).unwrap());
        }

        #[test]
        fn offset_by_reads_offset_as_elapsed_span() {
            let calendar = CalendarType::human();
            let anchor = date(10, 4, 21994).with_hour(20);
            // 2nd of January, hour 6: one day and six hours
            let offset = Timestamp::undated(2, 1).unwrap().with_hour(6);
            assert_eq!(
                calendar.offset_by(&anchor, &offset).unwrap(),
                date(12, 4, 21994).with_hour(2)
            );
        }

        #[test]
        fn offset_by_years_clamps_leap_day() {
            let calendar = CalendarType::human();
            let anchor = date(29, 2, 21974);
            let one_year = Timestamp::dated(1, 1, 1).unwrap();
            assert_eq!(calendar.offset_by(&anchor, &one_year).unwrap(), date(28, 2, 21975));
        }

        #[test]
        fn offset_by_rejects_negative_years() {
            let calendar = CalendarType::human();
            let back = Timestamp::dated(1, 1, -1).unwrap();
            assert!(calendar.offset_by(&date(1, 1, 21994), &back).is_err());
        }
    }

    mod eras {
        use super::*;

        #[test]
        fn human_year_resolves_to_common_era() {
            let calendar = CalendarType::human();
            let era = calendar.resolve_era(&date(12, 4, 21994)).unwrap();
            assert_eq!(era.name(), "Common Era");
            assert!(!calendar.eras()[0].contains(&date(12, 4, 21994)));
        }

        #[test]
        fn before_boundary_resolves_to_earlier_era() {
            let calendar = CalendarType::human();
            let era = calendar.resolve_era(&date(31, 12, 19999)).unwrap();
            assert_eq!(era.name(), "Before The Common Era");
        }

        #[test]
        fn boundary_belongs_to_the_later_era() {
            let calendar = CalendarType::tantar();
            assert_eq!(
                calendar.resolve_era(&date(1, 1, 903)).unwrap().name(),
                "The Age of Darkness"
            );
            assert_eq!(
                calendar.resolve_era(&date(24, 12, 902)).unwrap().name(),
                "The Age Of Reclamation"
            );
        }

        fn gapped(fallback: EraFallback) -> CalendarType {
            CalendarType::builder("Gapped", date(1, 1, 1), three_months())
                .eras(vec![era("First", Some(10), Some(20)), era("Second", Some(30), Some(40))])
                .gap_policy(GapPolicy::Allow)
                .era_fallback(fallback)
                .build()
                .unwrap()
        }

        #[test]
        fn uncovered_timestamp_errors_by_default() {
            let calendar = gapped(EraFallback::Error);
            let err = calendar.resolve_era(&date(1, 1, 25)).unwrap_err();
            assert!(matches!(err, DomainError::NoEra(_)));
        }

        #[test]
        fn nearest_fallback() {
            let calendar = gapped(EraFallback::Nearest);
            assert_eq!(calendar.resolve_era(&date(1, 1, 25)).unwrap().name(), "First");
            assert_eq!(calendar.resolve_era(&date(1, 1, 5)).unwrap().name(), "First");
            assert_eq!(calendar.resolve_era(&date(1, 1, 45)).unwrap().name(), "Second");
        }

        #[test]
        fn no_eras_means_no_era() {
            let calendar = CalendarType::builder("Plain", date(1, 1, 1), three_months())
                .era_fallback(EraFallback::Nearest)
                .build()
                .unwrap();
            assert!(matches!(
                calendar.resolve_era(&date(1, 1, 1)).unwrap_err(),
                DomainError::NoEra(_)
            ));
        }
    }

    mod formatting {
        use super::*;

        #[test]
        fn year_labels() {
            let calendar = CalendarType::human();
            assert_eq!(
                calendar.format_year(&date(12, 4, 21994)).unwrap().as_deref(),
                Some("1995 C.E")
            );
            assert_eq!(
                calendar.format_year(&date(12, 4, 19999)).unwrap().as_deref(),
                Some("1 B.C.E")
            );
            assert_eq!(calendar.format_year(&Timestamp::undated(1, 1).unwrap()).unwrap(), None);
        }

        #[test]
        fn prefix_year_label() {
            let calendar = CalendarType::tantar();
            assert_eq!(
                calendar.format_year(&date(3, 8, 11207)).unwrap().as_deref(),
                Some("D' Tar 40")
            );
        }

        #[test]
        fn month_day_naming() {
            let calendar = CalendarType::human();
            assert_eq!(
                calendar.format_date(&date(12, 4, 21994)).unwrap(),
                "April 12, 1995 C.E"
            );
        }

        #[test]
        fn day_of_month_naming() {
            let calendar = CalendarType::tantar();
            assert_eq!(
                calendar.format_date(&date(3, 8, 11207)).unwrap(),
                "3rd of Spite, D' Tar 40"
            );
            assert_eq!(
                calendar.format_date(&Timestamp::undated(21, 1).unwrap()).unwrap(),
                "21st of New Summer"
            );
        }

        #[test]
        fn calendar_without_eras_shows_raw_year() {
            let calendar = CalendarType::builder("Plain", date(1, 1, 1), three_months())
                .build()
                .unwrap();
            assert_eq!(calendar.format_date(&date(2, 2, 77)).unwrap(), "Bloom 2, 77");
        }

        #[test]
        fn format_date_rejects_unknown_month() {
            let calendar = CalendarType::human();
            assert!(calendar.format_date(&date(1, 13, 21994)).is_err());
        }

        #[test]
        fn time_uses_calendar_minutes() {
            let calendar = CalendarType::human();
            let t = date(1, 1, 21994).with_time(9, 0.5).unwrap();
            assert_eq!(calendar.format_time(&t), "9:30");
            assert_eq!(calendar.minute_of_hour(&t.with_time(9, 0.999).unwrap()), 59);
        }

        #[test]
        fn time_of_day_scales_to_day_length() {
            let human = CalendarType::human();
            let tantar = CalendarType::tantar();
            let at = |hour| date(1, 1, 21994).with_hour(hour);
            assert_eq!(human.time_of_day(&at(9)), TimeOfDay::Morning);
            assert_eq!(human.time_of_day(&at(20)), TimeOfDay::Evening);
            // Hour 9 of a 12-hour day is 18:00 on an Earth day
            assert_eq!(tantar.time_of_day(&at(9)), TimeOfDay::Evening);
            assert_eq!(tantar.time_of_day(&at(1)), TimeOfDay::Night);
        }
    }

    mod serde_shape {
        use super::*;

        #[test]
        fn deserialize_with_defaults() {
            let calendar: CalendarType = serde_json::from_str(
                r#"{
                    "name": "Moonreach",
                    "epoch": {"day": 1, "month": 1, "year": 500},
                    "months": [
                        {"name": "Waxing", "number_of_days": 15},
                        {"name": "Waning", "number_of_days": 15}
                    ],
                    "eras": [
                        {"name": "First Light", "affix": "FL", "start": {"day": 1, "month": 1, "year": 1}}
                    ],
                    "leap_year_frequency": 3,
                    "leap_date": {"day": 16, "month": 2}
                }"#,
            )
            .unwrap();
            assert_eq!(calendar.hours_in_a_day(), 24);
            assert_eq!(calendar.days_in_year(Some(503)), 31);
            assert_eq!(calendar.format_date(&date(4, 1, 500)).unwrap(), "Waxing 4, 500 FL");
        }

        #[test]
        fn deserialize_runs_validation() {
            let result: Result<CalendarType, _> = serde_json::from_str(
                r#"{"name": "Broken", "epoch": {"day": 1, "month": 1, "year": 1}, "months": []}"#,
            );
            assert!(result.unwrap_err().to_string().contains("at least one month"));
        }

        #[test]
        fn serialize_round_trips() {
            let calendar = CalendarType::human();
            let json = serde_json::to_string(&calendar).unwrap();
            let back: CalendarType = serde_json::from_str(&json).unwrap();
            assert_eq!(back, calendar);
        }
    }
}
