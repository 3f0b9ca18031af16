//! Town Setup
//!
//! Builds the initial town from its data file.

pub mod town;

pub use town::{build_topology, build_town, load_town, PersonData, TownData};
