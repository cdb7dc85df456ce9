//! Identifiers for timeline entities
//!
//! Events refer to their parent by id only, so ids must be stable, copyable,
//! and independent of where the event is stored.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim()).map(Self).map_err(|e| {
                    DomainError::parse(format!("Invalid {}: {}", stringify!($name), e))
                })
            }
        }
    };
}

define_id!(EventId);
define_id!(TimelineId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        assert_ne!(EventId::new(), EventId::new());
    }

    #[test]
    fn parse_round_trips_display() {
        let id = EventId::new();
        let parsed: EventId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = "not-a-uuid".parse::<TimelineId>().unwrap_err();
        assert!(matches!(err, DomainError::Parse(_)));
        assert!(err.to_string().contains("TimelineId"));
    }
}
