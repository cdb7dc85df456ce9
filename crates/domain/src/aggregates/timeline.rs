//! Timeline aggregate - An ordered collection of events
//!
//! Events are kept in narrative (insertion) order. Chronological order is
//! computed on demand against a `CalendarType`, because trailing events only
//! have a position once their parent chain is resolved in a calendar.
//!
//! Removing an event does not touch events that trail it; they become
//! orphans and resolve to no occurrence.

use serde::{Deserialize, Serialize};

use crate::entities::{Event, EventLookup};
use crate::error::DomainError;
use crate::ids::{EventId, TimelineId};
use crate::value_objects::{CalendarType, TimespanPart, TimespanType, Timestamp};

/// One day's share of an event, from `from` until `until`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySlice {
    pub part: TimespanPart,
    /// The day this slice falls on, at hour 0
    pub day: Timestamp,
    pub from: Timestamp,
    pub until: Timestamp,
}

/// A named, narratively ordered collection of events
///
/// # Invariants
///
/// - `name` is non-empty
/// - Event ids are unique within the timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TimelineFields", into = "TimelineFields")]
pub struct Timeline {
    id: TimelineId,
    name: String,
    events: Vec<Event>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TimelineFields {
    #[serde(default)]
    id: TimelineId,
    name: String,
    #[serde(default)]
    events: Vec<Event>,
}

impl Timeline {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Create an empty timeline.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the name is empty.
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("Timeline name cannot be empty"));
        }
        Ok(Self {
            id: TimelineId::new(),
            name,
            events: Vec::new(),
        })
    }

    /// A small timeline in the Human calendar: two birthdays, the day before
    /// one of them, and the week around it.
    pub fn sample() -> Self {
        let date = |day, month, year| {
            Timestamp::dated(day, month, year).expect("sample dates are valid")
        };

        let mut timeline = Self::new("Sample Timeline").expect("sample name is valid");
        let events = [
            Event::instant("My Birthday", date(12, 4, 21994).with_hour(3)),
            Event::instant("His Birthday", date(11, 3, 21993).with_hour(1)),
            Event::instant("The Day Before My Birthday", date(11, 4, 21994)),
            Event::duration("BirthWeek", date(10, 4, 21994), date(17, 4, 21994)),
        ];
        for event in events {
            timeline
                .add_event(event.expect("sample events are valid"))
                .expect("sample event ids are unique");
        }
        timeline
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn id(&self) -> TimelineId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Events in narrative order.
    #[inline]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn event(&self, id: EventId) -> Option<&Event> {
        self.events.iter().find(|event| event.id() == id)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Append an event to the end of the narrative.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if an event with the same id exists.
    pub fn add_event(&mut self, event: Event) -> Result<EventId, DomainError> {
        let id = event.id();
        if self.event(id).is_some() {
            return Err(DomainError::validation(format!(
                "Timeline '{}' already has event {}",
                self.name, id
            )));
        }
        self.events.push(event);
        Ok(id)
    }

    /// Remove an event; events trailing it are kept as orphans.
    pub fn remove_event(&mut self, id: EventId) -> Option<Event> {
        let index = self.events.iter().position(|event| event.id() == id)?;
        Some(self.events.remove(index))
    }

    // =========================================================================
    // Chronology
    // =========================================================================

    /// When an event happens in `calendar`.
    ///
    /// Absolute events occur at their start (for `SometimeBetween`, the
    /// earliest possible instant). Trailing events occur their offset after
    /// the parent's end, or after the parent's own occurrence when it has no
    /// end.
    ///
    /// Returns `Ok(None)` for an unknown id or an orphaned trailing chain.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for a cyclic trailing chain, and
    /// calendar errors when a timestamp does not exist in `calendar`.
    pub fn occurrence(
        &self,
        id: EventId,
        calendar: &CalendarType,
    ) -> Result<Option<Timestamp>, DomainError> {
        match self.event(id) {
            Some(event) => self.resolve(event, calendar, &mut Vec::new()),
            None => Ok(None),
        }
    }

    fn resolve(
        &self,
        event: &Event,
        calendar: &CalendarType,
        chain: &mut Vec<EventId>,
    ) -> Result<Option<Timestamp>, DomainError> {
        if !event.timespan_type().is_relative() {
            return Ok(Some(*event.start()));
        }
        if chain.contains(&event.id()) {
            return Err(DomainError::validation(format!(
                "Trailing chain through '{}' is cyclic",
                event.name()
            )));
        }
        chain.push(event.id());

        let Some(parent) = event.parent_event(self) else {
            return Ok(None);
        };
        let anchor = match parent.end() {
            Some(end) => *end,
            None => match self.resolve(parent, calendar, chain)? {
                Some(occurrence) => occurrence,
                None => return Ok(None),
            },
        };

        calendar.offset_by(&anchor, event.start()).map(Some)
    }

    /// Events sorted by occurrence; ties keep narrative order.
    ///
    /// Orphaned trailing events have no occurrence and are left out.
    pub fn chronological(
        &self,
        calendar: &CalendarType,
    ) -> Result<Vec<(Timestamp, &Event)>, DomainError> {
        let mut ordered = Vec::with_capacity(self.events.len());
        for event in &self.events {
            match self.resolve(event, calendar, &mut Vec::new())? {
                Some(at) => ordered.push((at, event)),
                None => {
                    tracing::warn!(
                        timeline = %self.name,
                        event = event.name(),
                        "Skipping event whose parent is missing"
                    );
                }
            }
        }
        ordered.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(ordered)
    }

    /// Splits an event into per-day slices.
    ///
    /// An `EntireDuration` event crossing midnight yields a `Beginning` slice
    /// (start until the next day begins), one `Middle` slice per whole day in
    /// between, and an `End` slice (the last day's start until the end).
    /// Everything else yields a single `Single` slice at its occurrence; an
    /// orphaned trailing event yields none.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the event is not on this timeline.
    pub fn day_slices(
        &self,
        id: EventId,
        calendar: &CalendarType,
    ) -> Result<Vec<DaySlice>, DomainError> {
        let event = self.event(id).ok_or_else(|| {
            DomainError::validation(format!("Timeline '{}' has no event {}", self.name, id))
        })?;

        let start = *event.start();
        if let (TimespanType::EntireDuration, Some(&end)) = (event.timespan_type(), event.end()) {
            if !start.same_day(&end) {
                return Self::spread(start, end, calendar);
            }
        }

        let Some(at) = self.resolve(event, calendar, &mut Vec::new())? else {
            return Ok(Vec::new());
        };
        Ok(vec![DaySlice {
            part: TimespanPart::Single,
            day: at.date(),
            from: at,
            until: event.end().copied().unwrap_or(at),
        }])
    }

    fn spread(
        start: Timestamp,
        end: Timestamp,
        calendar: &CalendarType,
    ) -> Result<Vec<DaySlice>, DomainError> {
        let mut next = calendar.next_day(&start.date())?;
        let mut slices = vec![DaySlice {
            part: TimespanPart::Beginning,
            day: start.date(),
            from: start,
            until: next,
        }];

        let last_day = end.date();
        while next.is_before(&last_day) {
            let day = next;
            next = calendar.next_day(&day)?;
            slices.push(DaySlice {
                part: TimespanPart::Middle,
                day,
                from: day,
                until: next,
            });
        }

        slices.push(DaySlice {
            part: TimespanPart::End,
            day: last_day,
            from: last_day,
            until: end,
        });
        Ok(slices)
    }
}

impl EventLookup for Timeline {
    fn find_event(&self, id: EventId) -> Option<&Event> {
        self.event(id)
    }
}

impl TryFrom<TimelineFields> for Timeline {
    type Error = DomainError;

    fn try_from(fields: TimelineFields) -> Result<Self, Self::Error> {
        let mut timeline = Self::new(fields.name)?;
        timeline.id = fields.id;
        for event in fields.events {
            timeline.add_event(event)?;
        }
        Ok(timeline)
    }
}

impl From<Timeline> for TimelineFields {
    fn from(timeline: Timeline) -> Self {
        Self {
            id: timeline.id,
            name: timeline.name,
            events: timeline.events,
        }
    }
}
