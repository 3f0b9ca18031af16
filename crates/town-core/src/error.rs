//! Error types for setting up and running a town.

use thiserror::Error;
use town_oracle::OracleError;

/// Failures while building a town from its data file.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("failed to read town file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid town file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{agent} starts at unknown location '{location}'")]
    UnknownLocation { agent: String, location: String },

    #[error("more than one person is named '{0}'")]
    DuplicateAgent(String),

    #[error("town has no locations")]
    NoLocations,

    #[error("connection names unknown location '{0}'")]
    UnknownConnection(String),
}

/// Failures during a run.
///
/// `Oracle` and `Io` abort the run; the lookups are reported to the caller.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("oracle failed: {0}")]
    Oracle(#[from] OracleError),

    #[error("output failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("no agent named '{0}'")]
    UnknownAgent(String),

    #[error("no location named '{0}'")]
    UnknownLocation(String),

    #[error("an agent named '{0}' already lives here")]
    DuplicateAgent(String),
}
