//! Shared record and event types for the town simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! It is a dependency for the other crates in the workspace.

pub mod event;
pub mod memory;
pub mod snapshot;
pub mod timestamp;

// Re-export timestamp types
pub use timestamp::{Hour, SimTimestamp};

// Re-export memory and rating types
pub use memory::{MemoryRecord, RatedMemory, RatedPlace, Rating, Recollection};

// Re-export event types
pub use event::{generate_event_id, EventKind, MoveResult, TickEvent};

// Re-export snapshot types
pub use snapshot::{generate_run_id, AgentSnapshot, LocationSnapshot, TownSnapshot};
