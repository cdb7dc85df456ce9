//! Unified error types for the domain layer
//!
//! Every failure here is a deterministic validation failure: the caller rejects
//! the Timestamp, Era, CalendarType, or Event being built. Nothing is retryable.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A value falls outside what the calendar type defines
    #[error("Out of range: {0}")]
    OutOfRange(String),

    /// Era ranges overlap, or leave a gap the calendar does not allow
    #[error("Era overlap: {0}")]
    Overlap(String),

    /// No era covers the timestamp and no fallback applies
    #[error("No era covers {0}")]
    NoEra(String),

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Creates a validation error for invariant violations.
    ///
    /// # Example
    /// ```ignore
    /// if name.trim().is_empty() {
    ///     return Err(DomainError::validation("Month name cannot be empty"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an out of range error
    pub fn out_of_range(msg: impl Into<String>) -> Self {
        Self::OutOfRange(msg.into())
    }

    /// Create an era overlap error
    pub fn overlap(msg: impl Into<String>) -> Self {
        Self::Overlap(msg.into())
    }

    /// Create a missing era error
    pub fn no_era(what: impl Into<String>) -> Self {
        Self::NoEra(what.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    ///
    /// Use this in `FromStr` implementations when the input string
    /// doesn't match any known variant.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}
