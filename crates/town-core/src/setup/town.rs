//! Town Setup
//!
//! Reads areas and people from the town JSON file. Key order in the file is
//! kept: it fixes the directory order and the order agents take their turns.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::components::{Agent, Location, LocationDirectory, WorldTopology};
use crate::error::{SetupError, SimError};
use crate::systems::Town;

/// One townsperson in the data file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonData {
    pub description: String,
    pub starting_location: String,
}

/// Contents of the town data file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TownData {
    /// Area name to description
    pub town_areas: IndexMap<String, String>,
    /// Person name to description and starting area
    pub town_people: IndexMap<String, PersonData>,
    /// Undirected links between areas; a ring over `town_areas` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connections: Option<Vec<(String, String)>>,
}

impl TownData {
    pub fn from_file(path: &Path) -> Result<Self, SetupError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, SetupError> {
        Ok(serde_json::from_str(content)?)
    }
}

/// World graph for `data`: its explicit connections, or the default ring.
pub fn build_topology(data: &TownData) -> Result<WorldTopology, SetupError> {
    let Some(connections) = &data.connections else {
        return Ok(WorldTopology::ring(data.town_areas.keys().cloned()));
    };

    let mut topology = WorldTopology::new();
    for name in data.town_areas.keys() {
        topology.add_location(name.clone());
    }
    for (a, b) in connections {
        for end in [a, b] {
            if !data.town_areas.contains_key(end) {
                return Err(SetupError::UnknownConnection(end.clone()));
            }
        }
        topology.connect(a, b);
    }
    Ok(topology)
}

/// Build a town with every person at their starting area
pub fn build_town(data: &TownData) -> Result<Town, SetupError> {
    if data.town_areas.is_empty() {
        return Err(SetupError::NoLocations);
    }

    let directory: LocationDirectory = data
        .town_areas
        .iter()
        .map(|(name, description)| Location::new(name.clone(), description.clone()))
        .collect();
    let topology = build_topology(data)?;
    let mut town = Town::new(directory, topology);

    for (name, person) in &data.town_people {
        let unknown = || SetupError::UnknownLocation {
            agent: name.clone(),
            location: person.starting_location.clone(),
        };
        if !town.directory().contains(&person.starting_location) {
            return Err(unknown());
        }
        let agent = Agent::new(
            name.clone(),
            person.description.clone(),
            person.starting_location.clone(),
        );
        town.add_agent(agent).map_err(|e| match e {
            SimError::DuplicateAgent(name) => SetupError::DuplicateAgent(name),
            _ => unknown(),
        })?;
    }

    tracing::info!(
        locations = town.directory().len(),
        agents = town.agents().len(),
        "town ready"
    );
    Ok(town)
}

/// Read and build the town in one go
pub fn load_town(path: &Path) -> Result<Town, SetupError> {
    build_town(&TownData::from_file(path)?)
}
