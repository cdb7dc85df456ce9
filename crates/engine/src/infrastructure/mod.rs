//! Adapters at the engine edge: configuration, logging, and calendar files.

pub mod calendars;
pub mod settings;
pub mod telemetry;

pub use calendars::{CalendarRegistry, LoadError};
pub use settings::{Settings, DEFAULT_LOG_FILTER};
pub use telemetry::init_tracing;
