//! Perception System
//!
//! The town arena: agents, the location directory and the world graph. Who is
//! where is always derived from the agents' own `location` fields.

use indexmap::IndexMap;
use town_events::{
    AgentSnapshot, Hour, LocationSnapshot, RatedPlace, SimTimestamp, TownSnapshot,
};
use town_oracle::{OracleError, TextOracle};

use crate::components::{
    Agent, Location, LocationDirectory, MoveOutcome, Reachability, WorldTopology,
};
use crate::error::SimError;
use crate::prompts::Acquaintance;
use crate::systems::rating::RatingPolicy;

/// Index of an agent in the town arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentId(pub usize);

/// Occupants per location, in directory order then arena order.
///
/// A snapshot; it does not follow later moves.
#[derive(Debug, Clone, Default)]
pub struct AgentsByLocation {
    map: IndexMap<String, Vec<AgentId>>,
}

impl AgentsByLocation {
    pub fn get(&self, location: &str) -> &[AgentId] {
        self.map.get(location).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[AgentId])> {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Every (location, agent) pair in processing order
    pub fn visiting_order(&self) -> Vec<(String, AgentId)> {
        self.map
            .iter()
            .flat_map(|(location, ids)| ids.iter().map(move |id| (location.clone(), *id)))
            .collect()
    }
}

/// Reachability restricted to directory locations
struct DirectoryBound<'a> {
    directory: &'a LocationDirectory,
    topology: &'a WorldTopology,
}

impl Reachability for DirectoryBound<'_> {
    fn path_exists(&self, from: &str, to: &str) -> bool {
        self.directory.contains(to) && self.topology.path_exists(from, to)
    }
}

/// All agents and places of a run
#[derive(Debug, Clone)]
pub struct Town {
    agents: Vec<Agent>,
    directory: LocationDirectory,
    topology: WorldTopology,
}

impl Town {
    pub fn new(directory: LocationDirectory, topology: WorldTopology) -> Self {
        Self {
            agents: Vec::new(),
            directory,
            topology,
        }
    }

    /// Add an agent at its starting location.
    ///
    /// Names identify memory sources, so each must be unique.
    pub fn add_agent(&mut self, agent: Agent) -> Result<AgentId, SimError> {
        if !self.directory.contains(agent.location()) {
            return Err(SimError::UnknownLocation(agent.location().to_string()));
        }
        if self.find(agent.name()).is_some() {
            return Err(SimError::DuplicateAgent(agent.name().to_string()));
        }
        self.agents.push(agent);
        Ok(AgentId(self.agents.len() - 1))
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn ids(&self) -> impl Iterator<Item = AgentId> {
        (0..self.agents.len()).map(AgentId)
    }

    pub fn agent(&self, id: AgentId) -> &Agent {
        &self.agents[id.0]
    }

    pub fn agent_mut(&mut self, id: AgentId) -> &mut Agent {
        &mut self.agents[id.0]
    }

    pub fn find(&self, name: &str) -> Option<AgentId> {
        self.agents.iter().position(|a| a.name() == name).map(AgentId)
    }

    /// Look up an agent by name
    pub fn agent_named(&self, name: &str) -> Result<&Agent, SimError> {
        self.find(name)
            .map(|id| self.agent(id))
            .ok_or_else(|| SimError::UnknownAgent(name.to_string()))
    }

    pub fn directory(&self) -> &LocationDirectory {
        &self.directory
    }

    pub fn topology(&self) -> &WorldTopology {
        &self.topology
    }

    pub fn location(&self, name: &str) -> Result<&Location, SimError> {
        self.directory
            .get(name)
            .ok_or_else(|| SimError::UnknownLocation(name.to_string()))
    }

    /// Agents currently at `location`, in arena order
    pub fn occupants(&self, location: &str) -> Vec<AgentId> {
        self.ids().filter(|id| self.agent(*id).location() == location).collect()
    }

    /// Build the occupant index for every directory location
    pub fn location_index(&self) -> AgentsByLocation {
        let mut map: IndexMap<String, Vec<AgentId>> = self
            .directory
            .iter()
            .map(|l| (l.name.clone(), Vec::new()))
            .collect();
        for id in self.ids() {
            if let Some(ids) = map.get_mut(self.agent(id).location()) {
                ids.push(id);
            }
        }
        AgentsByLocation { map }
    }

    /// Everyone sharing `id`'s location, excluding `id`
    pub fn company_of(&self, id: AgentId) -> Vec<Acquaintance> {
        let here = self.agent(id).location();
        self.occupants(here)
            .into_iter()
            .filter(|other| *other != id)
            .map(|other| self.agent(other).as_acquaintance())
            .collect()
    }

    /// Give every other agent at the actor's location a memory of `action`.
    ///
    /// Returns the agents who received it. The actor never records its own
    /// action.
    pub fn broadcast(&mut self, actor: AgentId, hour: Hour, action: &str) -> Vec<AgentId> {
        let here = self.agent(actor).location().to_string();
        let recipients: Vec<AgentId> = self
            .occupants(&here)
            .into_iter()
            .filter(|id| *id != actor)
            .collect();

        let record = self.agent_mut(actor).witness(hour, action);
        for id in &recipients {
            self.agent_mut(*id).observe(record.clone());
        }
        recipients
    }

    /// Rate every directory location for agent `id`
    pub fn rate_locations(
        &mut self,
        id: AgentId,
        oracle: &mut dyn TextOracle,
        hour: Hour,
        policy: RatingPolicy,
    ) -> Result<&[RatedPlace], OracleError> {
        let Town {
            agents, directory, ..
        } = self;
        agents[id.0].rate_locations(oracle, hour, directory, policy)
    }

    /// Move agent `id` to `target` if a path leads there.
    ///
    /// Names outside the directory are unreachable.
    pub fn move_agent(&mut self, id: AgentId, target: &str) -> MoveOutcome {
        let Town {
            agents,
            directory,
            topology,
        } = self;
        let bound = DirectoryBound {
            directory,
            topology,
        };
        agents[id.0].move_to(target, &bound)
    }

    /// Directory listing with occupants, one location per line
    pub fn listing(&self) -> String {
        let index = self.location_index();
        index
            .iter()
            .map(|(location, ids)| {
                let names: Vec<&str> = ids.iter().map(|id| self.agent(*id).name()).collect();
                format!("{location}: {}", names.join(", "))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn snapshot(&self, run_id: &str, timestamp: SimTimestamp) -> TownSnapshot {
        let agents = self
            .agents
            .iter()
            .map(|a| AgentSnapshot {
                name: a.name().to_string(),
                description: a.description().to_string(),
                location: a.location().to_string(),
                plans: a.plans().to_string(),
                memory_count: a.memory().len(),
                place_ratings: a.place_ratings().to_vec(),
            })
            .collect();

        let index = self.location_index();
        let locations = self
            .directory
            .iter()
            .map(|l| LocationSnapshot {
                name: l.name.clone(),
                description: l.description.clone(),
                occupants: index
                    .get(&l.name)
                    .iter()
                    .map(|id| self.agent(*id).name().to_string())
                    .collect(),
            })
            .collect();

        TownSnapshot {
            run_id: run_id.to_string(),
            timestamp,
            agents,
            locations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use town_events::Rating;
    use town_oracle::ScriptedOracle;

    fn town() -> Town {
        let directory: LocationDirectory =
            [("Park", "green"), ("Cafe", "busy"), ("Library", "quiet")]
                .into_iter()
                .map(|(n, d)| Location::new(n, d))
                .collect();
        let topology = WorldTopology::ring(directory.names());
        let mut town = Town::new(directory, topology);

        town.add_agent(Agent::new("Ann", "a baker", "Cafe")).unwrap();
        town.add_agent(Agent::new("Bob", "a painter", "Park")).unwrap();
        town.add_agent(Agent::new("Cy", "a student", "Cafe")).unwrap();
        town
    }

    #[test]
    fn test_occupants_are_derived_in_arena_order() {
        let town = town();
        let index = town.location_index();

        assert_eq!(index.get("Cafe"), &[AgentId(0), AgentId(2)]);
        assert_eq!(index.get("Park"), &[AgentId(1)]);
        assert!(index.get("Library").is_empty());

        let order: Vec<(String, AgentId)> = index.visiting_order();
        assert_eq!(order[0], ("Park".to_string(), AgentId(1)));
        assert_eq!(order[1], ("Cafe".to_string(), AgentId(0)));
    }

    #[test]
    fn test_company_excludes_self() {
        let town = town();
        let company = town.company_of(AgentId(0));

        assert_eq!(company.len(), 1);
        assert_eq!(company[0].name, "Cy");
        assert!(town.company_of(AgentId(1)).is_empty());
    }

    #[test]
    fn test_broadcast_reaches_only_co_located_others() {
        let mut town = town();
        let recipients = town.broadcast(AgentId(0), Hour(8), "bakes bread");

        assert_eq!(recipients, vec![AgentId(2)]);
        assert!(town.agent(AgentId(0)).memory().is_empty());
        assert!(town.agent(AgentId(1)).memory().is_empty());

        let record = &town.agent(AgentId(2)).memory().records()[0];
        assert_eq!(record.source, "Ann");
        assert_eq!(record.text, "bakes bread");
        assert_eq!(record.time, Hour(8));
    }

    #[test]
    fn test_move_updates_derived_rosters() {
        let mut town = town();
        let outcome = town.move_agent(AgentId(1), "Cafe");

        assert_eq!(outcome.location(), "Cafe");
        assert_eq!(town.occupants("Cafe"), vec![AgentId(0), AgentId(1), AgentId(2)]);
        assert!(town.occupants("Park").is_empty());
    }

    #[test]
    fn test_move_outside_directory_is_unreachable() {
        let mut town = town();
        let outcome = town.move_agent(AgentId(0), "Moon");

        assert!(matches!(outcome, MoveOutcome::Unreachable { .. }));
        assert_eq!(town.agent(AgentId(0)).location(), "Cafe");
    }

    #[test]
    fn test_add_agent_rejects_unknown_location() {
        let mut town = town();
        let err = town.add_agent(Agent::new("Dee", "a ghost", "Attic")).unwrap_err();
        assert!(matches!(err, SimError::UnknownLocation(ref l) if l == "Attic"));
        assert!(matches!(town.agent_named("Dee"), Err(SimError::UnknownAgent(_))));
    }

    #[test]
    fn test_add_agent_rejects_duplicate_name() {
        let mut town = town();
        let err = town
            .add_agent(Agent::new("Ann", "another baker", "Cafe"))
            .unwrap_err();

        assert!(matches!(err, SimError::DuplicateAgent(ref n) if n == "Ann"));
        assert_eq!(town.agents().len(), 3);

        // Only Cy hears Ann, and nobody holds a memory sourced from their own name
        town.broadcast(AgentId(0), Hour(8), "waves");
        for agent in town.agents() {
            assert_eq!(agent.memory().about(agent.name()).count(), 0);
        }
        assert_eq!(town.agent(AgentId(2)).memory().about("Ann").count(), 1);
    }

    #[test]
    fn test_rate_locations_through_town() {
        let mut town = town();
        let mut oracle = ScriptedOracle::new(["2", "4", "1"]);

        let ratings = town
            .rate_locations(AgentId(1), &mut oracle, Hour(8), RatingPolicy::default())
            .unwrap();
        assert_eq!(ratings[0].location, "Cafe");
        assert_eq!(ratings[0].rating, Rating::clamped(4));
    }

    #[test]
    fn test_snapshot_and_listing() {
        let town = town();
        let snapshot = town.snapshot("run_x", SimTimestamp::start(Hour(8)));

        assert_eq!(snapshot.agents.len(), 3);
        assert_eq!(snapshot.locations[1].occupants, vec!["Ann", "Cy"]);
        assert_eq!(town.listing(), "Park: Bob\nCafe: Ann, Cy\nLibrary: ");
    }
}
