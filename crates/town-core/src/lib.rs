//! Town Simulation
//!
//! Agents in a small town plan, act, watch each other, rate what they
//! remember and pick where to go next. Every judgment call is delegated to a
//! [`town_oracle::TextOracle`].

pub mod components;
pub mod config;
pub mod error;
pub mod output;
pub mod prompts;
pub mod setup;
pub mod systems;

use std::path::Path;

use town_events::generate_run_id;
use town_oracle::TextOracle;

pub use components::{Agent, Location, LocationDirectory, MoveOutcome, Reachability, WorldTopology};
pub use config::{default_config_toml, ConfigError, TownConfig};
pub use error::{SetupError, SimError};
pub use systems::{AgentId, Simulation, TickReport, Town};

/// Create the parent directory of an output path
pub fn ensure_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

/// Open the configured outputs and wrap `town` in a simulation.
///
/// The run gets a fresh ID, shared by the event log and the snapshot.
pub fn simulation_from_config<O: TextOracle>(
    config: &TownConfig,
    town: Town,
    oracle: O,
) -> Result<Simulation<O>, SimError> {
    let run_id = generate_run_id();

    ensure_parent(&config.output.transcript)?;
    let transcript =
        output::Transcript::create(&config.output.transcript, config.log, config.print)?;

    let events = match &config.output.events {
        Some(path) => {
            ensure_parent(path)?;
            output::EventLogger::new(path, run_id.clone())?
        }
        None => output::EventLogger::null(run_id.clone()),
    };

    tracing::info!(run_id = %run_id, oracle = oracle.name(), "simulation ready");
    Ok(Simulation::new(town, oracle, config.simulation.clone(), transcript, events))
}
