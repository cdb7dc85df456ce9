//! Storyline Engine library.
//!
//! Wraps the domain crate with what a running program needs.
//!
//! ## Structure
//!
//! - `infrastructure/` - Settings, tracing setup, and the calendar registry
//! - `render` - Plain-text event and timeline descriptions

pub mod infrastructure;
pub mod render;

pub use infrastructure::{init_tracing, CalendarRegistry, LoadError, Settings};
