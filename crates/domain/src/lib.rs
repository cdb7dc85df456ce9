//! Storyline domain: custom calendars and the events placed on them
//!
//! A `Timestamp` is only coordinates; a `CalendarType` gives it months, eras,
//! leap days, and day length. `Event`s sit on a `Timeline` and are ordered,
//! formatted, and split into days through the calendar they are read in.

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod ids;
pub mod value_objects;

pub use aggregates::{DaySlice, Timeline};
pub use entities::{Event, EventBuilder, EventLookup};
pub use error::DomainError;

// Re-export ID types
pub use ids::{EventId, TimelineId};

// Re-export value objects (explicit list in value_objects/mod.rs)
pub use value_objects::{
    ordinal, ordinal_suffix, AffixType, CalendarType, CalendarTypeBuilder, Era, EraFallback,
    GapPolicy, Month, TimeOfDay, TimespanPart, TimespanType, Timestamp, YearLabel,
};
