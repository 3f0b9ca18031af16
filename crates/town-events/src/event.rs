//! Event Types
//!
//! One event per observable step of an agent's tick, written as JSON lines.

use serde::{Deserialize, Serialize};

use crate::{RatedMemory, RatedPlace, Recollection, SimTimestamp};

/// Outcome of a move request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveResult {
    /// Target was the current location
    Stayed,
    /// Agent is now at the target
    Moved,
    /// No path exists; agent stayed put
    Unreachable,
}

/// What happened, with its payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// The agent replaced its plans
    Plan { plans: String },
    /// The agent acted; `company` lists who was there to see it
    Action { action: String, company: Vec<String> },
    /// The agent observed another agent's action
    Observation { source: String, text: String },
    /// The agent re-rated all of its memories
    MemoryRatings { ratings: Vec<RatedMemory> },
    /// The agent compressed its memories
    Recollection { recollection: Recollection },
    /// The agent rated every location, best first
    PlaceRatings { ratings: Vec<RatedPlace> },
    /// The agent asked to move
    Movement {
        from: String,
        to: String,
        result: MoveResult,
    },
}

impl EventKind {
    /// Short label used in logs
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Plan { .. } => "plan",
            EventKind::Action { .. } => "action",
            EventKind::Observation { .. } => "observation",
            EventKind::MemoryRatings { .. } => "memory_ratings",
            EventKind::Recollection { .. } => "recollection",
            EventKind::PlaceRatings { .. } => "place_ratings",
            EventKind::Movement { .. } => "movement",
        }
    }
}

/// A single simulation event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickEvent {
    pub event_id: String,
    /// Run the event belongs to; empty outside a logged run
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub run_id: String,
    pub timestamp: SimTimestamp,
    /// Agent the event belongs to
    pub agent: String,
    /// Where the agent was when the event happened
    pub location: String,
    #[serde(flatten)]
    pub kind: EventKind,
}

impl TickEvent {
    /// Create a new event with required fields.
    pub fn new(
        event_id: impl Into<String>,
        timestamp: SimTimestamp,
        agent: impl Into<String>,
        location: impl Into<String>,
        kind: EventKind,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            run_id: String::new(),
            timestamp,
            agent: agent.into(),
            location: location.into(),
            kind,
        }
    }

    /// Stamps the event with a run ID.
    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = run_id.into();
        self
    }

    /// Serializes the event to a JSON line (for JSONL format).
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes an event from a JSON line.
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

/// Generates an event ID with the given sequence number.
pub fn generate_event_id(sequence: u64) -> String {
    format!("evt_{:08}", sequence)
}
