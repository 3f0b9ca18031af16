//! Location Components
//!
//! Named places agents can be at. Occupancy is not stored here; it is derived
//! from the agents' own `location` fields (see [`crate::systems::perception`]).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A location in the town
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Unique name, also used as the key
    pub name: String,
    pub description: String,
}

impl Location {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Registry of all locations, iterated in insertion order.
///
/// Insertion order matters: it is the order agents rate locations in, and the
/// tie-break when two locations get the same rating.
#[derive(Debug, Clone, Default)]
pub struct LocationDirectory {
    locations: Vec<Location>,
    index: HashMap<String, usize>,
}

impl LocationDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a location. Re-registering a name replaces its description
    /// and keeps its original position.
    pub fn register(&mut self, location: Location) {
        match self.index.get(&location.name) {
            Some(&slot) => self.locations[slot] = location,
            None => {
                self.index.insert(location.name.clone(), self.locations.len());
                self.locations.push(location);
            }
        }
    }

    /// Get a location by name
    pub fn get(&self, name: &str) -> Option<&Location> {
        self.index.get(name).map(|&slot| &self.locations[slot])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All locations in directory order
    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.locations.iter()
    }

    /// All location names in directory order
    pub fn names(&self) -> Vec<&str> {
        self.locations.iter().map(|l| l.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

impl FromIterator<Location> for LocationDirectory {
    fn from_iter<T: IntoIterator<Item = Location>>(iter: T) -> Self {
        let mut directory = LocationDirectory::new();
        for location in iter {
            directory.register(location);
        }
        directory
    }
}
