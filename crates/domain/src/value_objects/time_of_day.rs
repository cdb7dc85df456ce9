use serde::{Deserialize, Serialize};

// =============================================================================
// Time of Day
// =============================================================================

/// Coarse period of a day, used for fuzzy event times.
///
/// Boundaries are defined on a 24-hour day and scaled to a calendar's own
/// day length, so a 12-hour day has its morning start at hour 2.5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    pub fn display_name(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "Morning",
            TimeOfDay::Afternoon => "Afternoon",
            TimeOfDay::Evening => "Evening",
            TimeOfDay::Night => "Night",
        }
    }

    /// Returns the starting hour for this period on a 24-hour day.
    pub fn start_hour(&self) -> u8 {
        match self {
            TimeOfDay::Morning => 5,
            TimeOfDay::Afternoon => 12,
            TimeOfDay::Evening => 18,
            TimeOfDay::Night => 22,
        }
    }

    /// Classifies a position in the day, given as a fraction in `[0, 1)`.
    pub fn from_day_fraction(fraction: f64) -> TimeOfDay {
        let hour = fraction * 24.0;
        if hour < f64::from(TimeOfDay::Morning.start_hour()) {
            TimeOfDay::Night
        } else if hour < f64::from(TimeOfDay::Afternoon.start_hour()) {
            TimeOfDay::Morning
        } else if hour < f64::from(TimeOfDay::Evening.start_hour()) {
            TimeOfDay::Afternoon
        } else if hour < f64::from(TimeOfDay::Night.start_hour()) {
            TimeOfDay::Evening
        } else {
            TimeOfDay::Night
        }
    }

    /// Returns all periods in order.
    pub fn all() -> [TimeOfDay; 4] {
        [
            TimeOfDay::Morning,
            TimeOfDay::Afternoon,
            TimeOfDay::Evening,
            TimeOfDay::Night,
        ]
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
