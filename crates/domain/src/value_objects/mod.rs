//! Value objects - Immutable objects defined by their attributes

mod calendar;
mod era;
mod time_of_day;
mod timespan;
mod timestamp;

// Calendar structure
pub use calendar::{CalendarType, CalendarTypeBuilder, EraFallback, GapPolicy, Month};
pub use era::{AffixType, Era, YearLabel};

// Points in time
pub use time_of_day::TimeOfDay;
pub use timestamp::{ordinal, ordinal_suffix, Timestamp};

// Event classification
pub use timespan::{TimespanPart, TimespanType};
