//! Snapshot Types
//!
//! Serialization structs for the end-of-run town snapshot.

use serde::{Deserialize, Serialize};

use crate::{RatedPlace, SimTimestamp};

/// Generates a fresh run ID.
pub fn generate_run_id() -> String {
    format!("run_{}", uuid::Uuid::new_v4().simple())
}

/// Agent state at snapshot time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub name: String,
    pub description: String,
    pub location: String,
    pub plans: String,
    pub memory_count: usize,
    /// Most recent place ratings, best first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub place_ratings: Vec<RatedPlace>,
}

/// Location state at snapshot time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationSnapshot {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub occupants: Vec<String>,
}

/// Complete town snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TownSnapshot {
    pub run_id: String,
    pub timestamp: SimTimestamp,
    pub agents: Vec<AgentSnapshot>,
    pub locations: Vec<LocationSnapshot>,
}

impl TownSnapshot {
    /// Looks up an agent by name.
    pub fn agent(&self, name: &str) -> Option<&AgentSnapshot> {
        self.agents.iter().find(|a| a.name == name)
    }

    /// Serializes to pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
