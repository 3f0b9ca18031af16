//! Memory and Rating Types
//!
//! Observation records and the ratings an agent derives from them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Hour;

/// A rating on the 0–5 scale.
///
/// Zero means "no usable rating"; the oracle is asked for 1–5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    /// Rating used when a response carries no number.
    pub const ZERO: Rating = Rating(0);
    /// Highest rating on the scale.
    pub const MAX: Rating = Rating(5);

    /// Builds a rating from a parsed number, clamping it onto the scale.
    pub fn clamped(value: u64) -> Self {
        Rating(value.min(Self::MAX.0 as u64) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Something an agent saw another agent do.
///
/// Records are immutable once formed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// Hour at which the observation was made
    pub time: Hour,
    /// Name of the agent whose action was observed
    pub source: String,
    /// The observed action
    pub text: String,
}

impl MemoryRecord {
    pub fn new(time: Hour, source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            time,
            source: source.into(),
            text: text.into(),
        }
    }
}

impl fmt::Display for MemoryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[Time: {}. Person: {}. Memory: {}]",
            self.time.0, self.source, self.text
        )
    }
}

/// A memory together with the rating the oracle gave it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatedMemory {
    /// Rendered memory text as it was shown to the oracle
    pub memory: String,
    pub rating: Rating,
    /// Raw oracle reply the rating was parsed from
    pub response: String,
}

/// A location together with how much the agent wants to go there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatedPlace {
    pub location: String,
    pub rating: Rating,
    /// Raw oracle reply the rating was parsed from
    pub response: String,
}

/// The compressed form of an agent's top-rated memories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recollection {
    pub time: Hour,
    /// Memory texts joined with `.`
    pub text: String,
    /// How many memories went into the recollection
    pub memory_count: usize,
}

impl fmt::Display for Recollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Recollection at Time {}: {}]", self.time, self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_clamps_to_scale() {
        assert_eq!(Rating::clamped(0), Rating::ZERO);
        assert_eq!(Rating::clamped(3).value(), 3);
        assert_eq!(Rating::clamped(5), Rating::MAX);
        assert_eq!(Rating::clamped(10), Rating::MAX);
        assert_eq!(Rating::clamped(u64::MAX), Rating::MAX);
    }

    #[test]
    fn test_memory_record_display() {
        let record = MemoryRecord::new(Hour(9), "Isabella", "opens the cafe");
        assert_eq!(
            record.to_string(),
            "[Time: 9. Person: Isabella. Memory: opens the cafe]"
        );
    }

    #[test]
    fn test_recollection_display() {
        let recollection = Recollection {
            time: Hour(12),
            text: "first.second".to_string(),
            memory_count: 2,
        };
        assert_eq!(
            recollection.to_string(),
            "[Recollection at Time 12:00: first.second]"
        );
    }
}
