//! Plain-text rendering of events and timelines in a calendar.

use std::fmt::Write;

use storyline_domain::{
    CalendarType, DomainError, Event, TimeOfDay, Timeline, TimespanPart, TimespanType, Timestamp,
};

/// One line describing when `event` happens, read in `calendar`.
///
/// Trailing events are placed through `timeline`; one whose parent is gone
/// is described relative to the missing parent.
pub fn describe_event(
    event: &Event,
    timeline: &Timeline,
    calendar: &CalendarType,
) -> Result<String, DomainError> {
    let when = match event.timespan_type() {
        TimespanType::InitialInstant => at(calendar, event.start())?,
        TimespanType::EntireDuration => format!(
            "from {} to {}",
            at(calendar, event.start())?,
            at(calendar, window_end(event)?)?
        ),
        TimespanType::SometimeBetween => format!(
            "sometime between {} and {}",
            at(calendar, event.start())?,
            at(calendar, window_end(event)?)?
        ),
        TimespanType::FuzzyTimeOfDay => format!(
            "{}, {}",
            calendar.format_date(event.start())?,
            period(calendar.time_of_day(event.start()))
        ),
        TimespanType::TrailingAction => {
            match (
                timeline.occurrence(event.id(), calendar)?,
                event.parent_event(timeline),
            ) {
                (Some(occurrence), Some(parent)) => {
                    format!("{}, following {}", at(calendar, &occurrence)?, parent.name())
                }
                _ => "following an event no longer on the timeline".to_string(),
            }
        }
    };

    let mut line = format!("{}: {}", event.name(), when);
    if event.timespan_part() != TimespanPart::Single {
        let _ = write!(line, " [{}]", event.timespan_part());
    }
    Ok(line)
}

/// The timeline in chronological order, one event per line under a header.
pub fn render_timeline(timeline: &Timeline, calendar: &CalendarType) -> Result<String, DomainError> {
    let mut out = format!("{} ({} calendar)\n", timeline.name(), calendar.name());
    for (_, event) in timeline.chronological(calendar)? {
        let _ = writeln!(out, "- {}", describe_event(event, timeline, calendar)?);
    }
    Ok(out)
}

fn at(calendar: &CalendarType, timestamp: &Timestamp) -> Result<String, DomainError> {
    Ok(format!(
        "{} at {}",
        calendar.format_date(timestamp)?,
        calendar.format_time(timestamp)
    ))
}

fn window_end(event: &Event) -> Result<&Timestamp, DomainError> {
    event.end().ok_or_else(|| {
        DomainError::validation(format!("{} event '{}' has no end", event.timespan_type(), event.name()))
    })
}

fn period(time_of_day: TimeOfDay) -> &'static str {
    match time_of_day {
        TimeOfDay::Morning => "in the morning",
        TimeOfDay::Afternoon => "in the afternoon",
        TimeOfDay::Evening => "in the evening",
        TimeOfDay::Night => "at night",
    }
}
