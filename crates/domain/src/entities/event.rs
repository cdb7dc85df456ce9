//! Event entity - Something that happens on a timeline
//!
//! An event's timestamps only mean something together with its
//! `TimespanType`: an instant, a whole duration, an unknown moment inside a
//! window, a fuzzy time of day, or an offset after a parent event.
//!
//! Parents are referenced by `EventId`, never owned. Resolving a parent goes
//! through an `EventLookup` (usually the `Timeline` holding both events), and
//! a parent that has since been removed resolves to `None`.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::EventId;
use crate::value_objects::{TimespanPart, TimespanType, Timestamp};

/// Anything that can find events by id.
pub trait EventLookup {
    fn find_event(&self, id: EventId) -> Option<&Event>;
}

/// A named occurrence on a timeline
///
/// # Invariants
///
/// - `name` is non-empty
/// - `EntireDuration` and `SometimeBetween` have an `end` that is not before `start`
/// - `FuzzyTimeOfDay` and `TrailingAction` have no `end`
/// - `TrailingAction` has a parent; no other type does
///
/// # Example
///
/// ```
/// use storyline_domain::entities::Event;
/// use storyline_domain::value_objects::{Timestamp, TimespanType};
///
/// let week = Event::builder("BirthWeek", Timestamp::dated(10, 4, 21994).unwrap())
///     .end(Timestamp::dated(17, 4, 21994).unwrap())
///     .build()
///     .unwrap();
///
/// assert_eq!(week.timespan_type(), TimespanType::EntireDuration);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EventFields", into = "EventFields")]
pub struct Event {
    // Identity
    id: EventId,
    name: String,

    // When
    start: Timestamp,
    end: Option<Timestamp>,
    timespan_type: TimespanType,
    timespan_part: TimespanPart,

    /// Weak reference; the parent may no longer exist
    parent: Option<EventId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct EventFields {
    #[serde(default)]
    id: EventId,
    name: String,
    start: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end: Option<Timestamp>,
    #[serde(default)]
    timespan_type: TimespanType,
    #[serde(default)]
    timespan_part: TimespanPart,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent: Option<EventId>,
}

/// Builder for `Event`; validation happens in `build()`.
#[derive(Debug, Clone)]
pub struct EventBuilder {
    fields: EventFields,
}

impl EventBuilder {
    pub fn end(mut self, end: Timestamp) -> Self {
        self.fields.end = Some(end);
        self
    }

    pub fn timespan_type(mut self, timespan_type: TimespanType) -> Self {
        self.fields.timespan_type = timespan_type;
        self
    }

    pub fn timespan_part(mut self, timespan_part: TimespanPart) -> Self {
        self.fields.timespan_part = timespan_part;
        self
    }

    pub fn parent(mut self, parent: EventId) -> Self {
        self.fields.parent = Some(parent);
        self
    }

    /// Use an existing id instead of a fresh one (e.g., when reloading).
    pub fn with_id(mut self, id: EventId) -> Self {
        self.fields.id = id;
        self
    }

    /// Validate and build the event.
    ///
    /// An `InitialInstant` event given an end becomes `EntireDuration`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the name is empty or the dates,
    /// parent, and timespan type do not fit together.
    pub fn build(self) -> Result<Event, DomainError> {
        let f = self.fields;
        let name = f.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("Event name cannot be empty"));
        }

        let timespan_type = match (f.timespan_type, f.end) {
            (TimespanType::InitialInstant, Some(_)) => TimespanType::EntireDuration,
            (other, _) => other,
        };

        match (timespan_type.requires_end(), f.end) {
            (true, None) => {
                return Err(DomainError::validation(format!(
                    "{} event '{}' needs an end",
                    timespan_type, name
                )));
            }
            (true, Some(end)) if end.is_dated() != f.start.is_dated() => {
                return Err(DomainError::validation(format!(
                    "Event '{}' mixes dated and undated timestamps ({} to {})",
                    name, f.start, end
                )));
            }
            (true, Some(end)) if end.is_before(&f.start) => {
                return Err(DomainError::validation(format!(
                    "Event '{}' ends at {} before it starts at {}",
                    name, end, f.start
                )));
            }
            (false, Some(_)) => {
                return Err(DomainError::validation(format!(
                    "{} event '{}' cannot have an end",
                    timespan_type, name
                )));
            }
            _ => {}
        }

        match (timespan_type.is_relative(), f.parent) {
            (true, None) => {
                return Err(DomainError::validation(format!(
                    "Trailing event '{}' needs a parent",
                    name
                )));
            }
            (false, Some(_)) => {
                return Err(DomainError::validation(format!(
                    "Only trailing events have a parent; '{}' is {}",
                    name, timespan_type
                )));
            }
            _ => {}
        }

        if f.parent == Some(f.id) {
            return Err(DomainError::validation(format!(
                "Event '{}' cannot trail itself",
                name
            )));
        }

        Ok(Event {
            id: f.id,
            name,
            start: f.start,
            end: f.end,
            timespan_type,
            timespan_part: f.timespan_part,
            parent: f.parent,
        })
    }
}

impl Event {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Start building an event that happens at `start`.
    pub fn builder(name: impl Into<String>, start: Timestamp) -> EventBuilder {
        EventBuilder {
            fields: EventFields {
                id: EventId::new(),
                name: name.into(),
                start,
                end: None,
                timespan_type: TimespanType::default(),
                timespan_part: TimespanPart::default(),
                parent: None,
            },
        }
    }

    /// An event at a single instant.
    pub fn instant(name: impl Into<String>, at: Timestamp) -> Result<Self, DomainError> {
        Self::builder(name, at).build()
    }

    /// An event lasting from `start` to `end`.
    pub fn duration(
        name: impl Into<String>,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Self, DomainError> {
        Self::builder(name, start).end(end).build()
    }

    /// An event `offset` after its parent (see `CalendarType::offset_by`).
    pub fn trailing(
        name: impl Into<String>,
        parent: EventId,
        offset: Timestamp,
    ) -> Result<Self, DomainError> {
        Self::builder(name, offset)
            .timespan_type(TimespanType::TrailingAction)
            .parent(parent)
            .build()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn id(&self) -> EventId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The start; for trailing events, the offset after the parent.
    #[inline]
    pub fn start(&self) -> &Timestamp {
        &self.start
    }

    #[inline]
    pub fn end(&self) -> Option<&Timestamp> {
        self.end.as_ref()
    }

    #[inline]
    pub fn timespan_type(&self) -> TimespanType {
        self.timespan_type
    }

    #[inline]
    pub fn timespan_part(&self) -> TimespanPart {
        self.timespan_part
    }

    #[inline]
    pub fn parent_id(&self) -> Option<EventId> {
        self.parent
    }

    /// Resolves the parent event, if there is one and it still exists.
    pub fn parent_event<'a, L>(&self, lookup: &'a L) -> Option<&'a Event>
    where
        L: EventLookup + ?Sized,
    {
        self.parent.and_then(|id| lookup.find_event(id))
    }

    /// Returns true if the event spans more than one stored timestamp.
    pub fn has_window(&self) -> bool {
        self.end.is_some()
    }
}

impl TryFrom<EventFields> for Event {
    type Error = DomainError;

    fn try_from(fields: EventFields) -> Result<Self, Self::Error> {
        EventBuilder { fields }.build()
    }
}

impl From<Event> for EventFields {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            name: event.name,
            start: event.start,
            end: event.end,
            timespan_type: event.timespan_type,
            timespan_part: event.timespan_part,
            parent: event.parent,
        }
    }
}
