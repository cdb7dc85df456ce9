//! Domain entities - Core business objects with identity

mod event;

pub use event::{Event, EventBuilder, EventLookup};
