//! Town Components
//!
//! Plain state owned by the town: agents, locations, memories and the world
//! graph.

pub mod agent;
pub mod location;
pub mod memory;
pub mod topology;

pub use agent::{Agent, MoveOutcome, TickPhase};
pub use location::{Location, LocationDirectory};
pub use memory::{MemoryStore, DEFAULT_MEMORY_LIMIT};
pub use topology::{Reachability, WorldTopology};
