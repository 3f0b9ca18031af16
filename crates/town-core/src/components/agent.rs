//! Agent Components
//!
//! An agent's identity, plans, memories and place preferences, and the steps
//! of its per-tick routine.

use serde::{Deserialize, Serialize};
use std::fmt;
use town_events::{Hour, MemoryRecord, MoveResult, RatedMemory, RatedPlace, Recollection};
use town_oracle::{OracleError, TextOracle};

use crate::components::location::{Location, LocationDirectory};
use crate::components::memory::MemoryStore;
use crate::components::topology::Reachability;
use crate::prompts::{self, Acquaintance};
use crate::systems::rating::{ask_rating, RatingPolicy};

/// Where an agent is in its tick.
///
/// Steps run in declaration order; `Idle` holds until the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TickPhase {
    Planning,
    Acting,
    Broadcasting,
    RatingMemories,
    RatingLocations,
    Moving,
    #[default]
    Idle,
}

/// What a move request did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Target was the current location
    Stayed { at: String },
    Moved { from: String, to: String },
    /// No path to the target; the agent stays at `from`
    Unreachable { from: String, to: String },
}

impl MoveOutcome {
    /// Location the agent ends up at
    pub fn location(&self) -> &str {
        match self {
            MoveOutcome::Stayed { at } => at,
            MoveOutcome::Moved { to, .. } => to,
            MoveOutcome::Unreachable { from, .. } => from,
        }
    }

    pub fn result(&self) -> MoveResult {
        match self {
            MoveOutcome::Stayed { .. } => MoveResult::Stayed,
            MoveOutcome::Moved { .. } => MoveResult::Moved,
            MoveOutcome::Unreachable { .. } => MoveResult::Unreachable,
        }
    }
}

impl fmt::Display for MoveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveOutcome::Stayed { at } => write!(f, "stays at {at}"),
            MoveOutcome::Moved { from, to } => write!(f, "moves from {from} to {to}"),
            MoveOutcome::Unreachable { from, to } => {
                write!(f, "cannot reach {to} from {from}, stays at {from}")
            }
        }
    }
}

/// A simulated townsperson
#[derive(Debug, Clone)]
pub struct Agent {
    name: String,
    description: String,
    /// Canonical location; only [`Agent::move_to`] changes it
    location: String,
    plans: String,
    memory: MemoryStore,
    /// Latest place ratings, best first
    place_ratings: Vec<RatedPlace>,
    phase: TickPhase,
    /// Rating replies without a number since the last `take_unparsed`
    unparsed: usize,
}

impl Agent {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            location: location.into(),
            plans: String::new(),
            memory: MemoryStore::new(),
            place_ratings: Vec::new(),
            phase: TickPhase::Idle,
            unparsed: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn plans(&self) -> &str {
        &self.plans
    }

    pub fn memory(&self) -> &MemoryStore {
        &self.memory
    }

    pub fn memory_ratings(&self) -> &[RatedMemory] {
        self.memory.ratings()
    }

    pub fn place_ratings(&self) -> &[RatedPlace] {
        &self.place_ratings
    }

    pub fn phase(&self) -> TickPhase {
        self.phase
    }

    /// Count of number-less rating replies since the last call, then reset
    pub fn take_unparsed(&mut self) -> usize {
        std::mem::take(&mut self.unparsed)
    }

    /// How this agent appears to others
    pub fn as_acquaintance(&self) -> Acquaintance {
        Acquaintance {
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }

    /// Replace the plans with a fresh goal statement from the oracle.
    ///
    /// The reply is kept verbatim, however long it is.
    pub fn plan(&mut self, oracle: &mut dyn TextOracle, hour: Hour) -> Result<&str, OracleError> {
        self.phase = TickPhase::Planning;
        let prompt = prompts::plan(&self.name, &self.description, hour);
        self.plans = oracle.generate(&prompt)?;
        tracing::debug!(agent = %self.name, plans = %self.plans, "planned");
        Ok(&self.plans)
    }

    /// Decide what to do this hour given who else is here.
    ///
    /// `company` must not include this agent. Returns the oracle's reply
    /// unchanged; nobody observes it until it is broadcast.
    pub fn execute_action(
        &mut self,
        oracle: &mut dyn TextOracle,
        hour: Hour,
        location: &Location,
        company: &[Acquaintance],
    ) -> Result<String, OracleError> {
        self.phase = TickPhase::Acting;
        let prompt = prompts::action(&self.name, &self.plans, location, hour, company);
        let action = oracle.generate(&prompt)?;
        tracing::debug!(agent = %self.name, action = %action, "acted");
        Ok(action)
    }

    /// The memory another agent forms on seeing `action`.
    pub fn witness(&mut self, hour: Hour, action: &str) -> MemoryRecord {
        self.phase = TickPhase::Broadcasting;
        MemoryRecord::new(hour, self.name.clone(), action)
    }

    /// Remember something another agent did.
    pub fn observe(&mut self, record: MemoryRecord) {
        self.memory.record(record);
    }

    /// Rate every memory 0–5 and replace the previous ratings.
    ///
    /// Afterwards there is exactly one rating per memory, in memory order.
    pub fn rate_memories(
        &mut self,
        oracle: &mut dyn TextOracle,
        hour: Hour,
        policy: RatingPolicy,
    ) -> Result<&[RatedMemory], OracleError> {
        self.phase = TickPhase::RatingMemories;
        let mut ratings = Vec::with_capacity(self.memory.len());

        for record in self.memory.records() {
            let memory = record.to_string();
            let prompt =
                prompts::memory_rating(&self.name, &self.plans, &self.location, hour, &memory);
            let reply = ask_rating(oracle, &prompt, policy)?;
            if !reply.parsed {
                self.unparsed += 1;
            }
            ratings.push(RatedMemory {
                memory,
                rating: reply.rating,
                response: reply.response,
            });
        }

        self.memory.replace_ratings(ratings);
        Ok(self.memory.ratings())
    }

    /// Join the `limit` best-rated memories into a recollection.
    pub fn compress_memories(&self, hour: Hour, limit: usize) -> Recollection {
        self.memory.compress(hour, limit)
    }

    /// Rate every location in the directory and keep them best first.
    ///
    /// Locations with equal ratings stay in directory order.
    pub fn rate_locations(
        &mut self,
        oracle: &mut dyn TextOracle,
        hour: Hour,
        directory: &LocationDirectory,
        policy: RatingPolicy,
    ) -> Result<&[RatedPlace], OracleError> {
        self.phase = TickPhase::RatingLocations;
        let mut ratings = Vec::with_capacity(directory.len());

        for candidate in directory.iter() {
            let prompt = prompts::place_rating(
                &self.name,
                &self.plans,
                hour,
                &self.location,
                &candidate.name,
            );
            let reply = ask_rating(oracle, &prompt, policy)?;
            if !reply.parsed {
                self.unparsed += 1;
            }
            ratings.push(RatedPlace {
                location: candidate.name.clone(),
                rating: reply.rating,
                response: reply.response,
            });
        }

        ratings.sort_by(|a, b| b.rating.cmp(&a.rating));
        self.place_ratings = ratings;
        Ok(&self.place_ratings)
    }

    /// Top-rated location from the latest rating pass
    pub fn preferred_destination(&self) -> Option<&str> {
        self.place_ratings.first().map(|p| p.location.as_str())
    }

    /// Go to `target` if any path leads there.
    ///
    /// Moving is instantaneous; the path itself is never walked. An
    /// unreachable target leaves the agent where it is.
    pub fn move_to(&mut self, target: &str, topology: &dyn Reachability) -> MoveOutcome {
        self.phase = TickPhase::Moving;
        let outcome = if target == self.location {
            MoveOutcome::Stayed {
                at: self.location.clone(),
            }
        } else if topology.path_exists(&self.location, target) {
            let from = std::mem::replace(&mut self.location, target.to_string());
            MoveOutcome::Moved {
                from,
                to: target.to_string(),
            }
        } else {
            tracing::warn!(
                agent = %self.name,
                from = %self.location,
                to = %target,
                "no path, move rejected"
            );
            MoveOutcome::Unreachable {
                from: self.location.clone(),
                to: target.to_string(),
            }
        };
        self.phase = TickPhase::Idle;
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::topology::WorldTopology;
    use town_events::Rating;
    use town_oracle::ScriptedOracle;

    struct NoPaths;

    impl Reachability for NoPaths {
        fn path_exists(&self, _from: &str, _to: &str) -> bool {
            false
        }
    }

    fn directory(names: &[&str]) -> LocationDirectory {
        names.iter().map(|n| Location::new(*n, format!("{n} place"))).collect()
    }

    fn agent_with_memories(count: usize) -> Agent {
        let mut agent = Agent::new("Ann", "a baker", "Cafe");
        for i in 0..count {
            agent.observe(MemoryRecord::new(Hour(8), "Bob", format!("does thing {i}")));
        }
        agent
    }

    #[test]
    fn test_plan_is_kept_verbatim() {
        let long_plan = "word ".repeat(200);
        let mut oracle = ScriptedOracle::new([long_plan.clone()]);
        let mut agent = Agent::new("Ann", "a baker", "Cafe");

        agent.plan(&mut oracle, Hour(8)).unwrap();
        assert_eq!(agent.plans(), long_plan);
        assert!(oracle.prompts()[0].contains("starting at 8:00"));
        assert_eq!(agent.phase(), TickPhase::Planning);
    }

    #[test]
    fn test_execute_action_returns_raw_reply_without_recording() {
        let mut oracle = ScriptedOracle::new(["  Bake croissants.  "]);
        let mut agent = Agent::new("Ann", "a baker", "Cafe");
        let cafe = Location::new("Cafe", "warm");
        let bob = Agent::new("Bob", "a painter", "Cafe");

        let action = agent
            .execute_action(&mut oracle, Hour(8), &cafe, &[bob.as_acquaintance()])
            .unwrap();

        assert_eq!(action, "  Bake croissants.  ");
        assert!(agent.memory().is_empty());
        assert!(oracle.prompts()[0].contains("Bob: a painter"));
    }

    #[test]
    fn test_rate_memories_one_rating_per_memory() {
        let mut oracle = ScriptedOracle::new(["3", "I'd say 5 out of 5", "no idea", "9"]);
        let mut agent = agent_with_memories(4);

        let ratings = agent.rate_memories(&mut oracle, Hour(9), RatingPolicy::default()).unwrap();
        let values: Vec<u8> = ratings.iter().map(|r| r.rating.value()).collect();

        assert_eq!(values, vec![3, 5, 0, 5]);
        assert_eq!(agent.memory_ratings().len(), agent.memory().len());
        assert_eq!(agent.memory_ratings()[2].response, "no idea");
        assert!(agent.memory_ratings().iter().all(|r| r.rating <= Rating::MAX));
        assert_eq!(oracle.call_count(), 4);
    }

    #[test]
    fn test_rate_memories_replaces_previous_pass() {
        let mut oracle = ScriptedOracle::repeating("2");
        let mut agent = agent_with_memories(2);

        agent.rate_memories(&mut oracle, Hour(9), RatingPolicy::default()).unwrap();
        agent.observe(MemoryRecord::new(Hour(9), "Cy", "arrives"));
        agent.rate_memories(&mut oracle, Hour(10), RatingPolicy::default()).unwrap();

        assert_eq!(agent.memory_ratings().len(), 3);
        assert!(agent.memory_ratings()[2].memory.contains("Person: Cy"));
    }

    #[test]
    fn test_rate_memories_with_no_memories() {
        let mut oracle = ScriptedOracle::new(Vec::<String>::new());
        let mut agent = Agent::new("Ann", "a baker", "Cafe");

        let ratings = agent.rate_memories(&mut oracle, Hour(9), RatingPolicy::default()).unwrap();
        assert!(ratings.is_empty());
        assert_eq!(oracle.call_count(), 0);
    }

    #[test]
    fn test_rate_locations_ties_keep_directory_order() {
        let mut oracle = ScriptedOracle::from_fn(|prompt| {
            let rating = if prompt.contains("go to A next") {
                "3"
            } else {
                "5"
            };
            Some(rating.to_string())
        });
        let mut agent = Agent::new("Ann", "a baker", "A");

        let ratings = agent
            .rate_locations(
                &mut oracle,
                Hour(9),
                &directory(&["A", "B", "C"]),
                RatingPolicy::default(),
            )
            .unwrap();
        let order: Vec<&str> = ratings.iter().map(|p| p.location.as_str()).collect();

        assert_eq!(order, vec!["B", "C", "A"]);
        assert_eq!(agent.preferred_destination(), Some("B"));
    }

    #[test]
    fn test_rate_locations_covers_every_location_once() {
        let mut oracle = ScriptedOracle::new(["1", "nope", "4", "2", "4"]);
        let mut agent = Agent::new("Ann", "a baker", "Park");
        let names = ["Park", "Cafe", "Library", "Market", "Beach"];

        agent
            .rate_locations(&mut oracle, Hour(9), &directory(&names), RatingPolicy::default())
            .unwrap();
        let mut rated: Vec<&str> = agent
            .place_ratings()
            .iter()
            .map(|p| p.location.as_str())
            .collect();

        assert_eq!(rated, vec!["Library", "Beach", "Market", "Park", "Cafe"]);
        rated.sort();
        let mut expected = names.to_vec();
        expected.sort();
        assert_eq!(rated, expected);
    }

    #[test]
    fn test_move_to_current_location_is_noop() {
        let mut agent = Agent::new("Ann", "a baker", "Cafe");
        let outcome = agent.move_to("Cafe", &NoPaths);

        assert_eq!(outcome, MoveOutcome::Stayed { at: "Cafe".to_string() });
        assert_eq!(outcome.location(), "Cafe");
        assert_eq!(agent.location(), "Cafe");
    }

    #[test]
    fn test_move_to_unreachable_keeps_location() {
        let mut agent = Agent::new("Ann", "a baker", "Cafe");
        let outcome = agent.move_to("Island", &NoPaths);

        assert_eq!(outcome.result(), MoveResult::Unreachable);
        assert_eq!(agent.location(), "Cafe");
        assert_eq!(outcome.to_string(), "cannot reach Island from Cafe, stays at Cafe");
    }

    #[test]
    fn test_move_to_reachable_teleports() {
        let topology = WorldTopology::ring(["Cafe", "Park", "Library", "Market"]);
        let mut agent = Agent::new("Ann", "a baker", "Cafe");

        let outcome = agent.move_to("Library", &topology);
        assert_eq!(
            outcome,
            MoveOutcome::Moved {
                from: "Cafe".to_string(),
                to: "Library".to_string()
            }
        );
        assert_eq!(agent.location(), "Library");
        assert_eq!(agent.phase(), TickPhase::Idle);
    }
}
