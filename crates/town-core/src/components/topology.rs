//! World Topology
//!
//! Undirected graph of location names, used only to answer "is there any path
//! from here to there".

use std::collections::{HashMap, HashSet, VecDeque};

/// Yes/no reachability between two locations.
pub trait Reachability {
    fn path_exists(&self, from: &str, to: &str) -> bool;
}

/// Undirected adjacency graph keyed by location name
#[derive(Debug, Clone, Default)]
pub struct WorldTopology {
    adjacent: HashMap<String, Vec<String>>,
}

impl WorldTopology {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ring over `names` in order: every node has a self-loop, neighbours in
    /// the sequence are linked and the last node links back to the first.
    pub fn ring<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let mut topology = WorldTopology::new();

        for (i, name) in names.iter().enumerate() {
            topology.connect(name, name);
            if i > 0 {
                topology.connect(name, &names[i - 1]);
            }
        }
        if let (Some(first), Some(last)) = (names.first(), names.last()) {
            topology.connect(first, last);
        }
        topology
    }

    /// Add a node with no edges
    pub fn add_location(&mut self, name: impl Into<String>) {
        self.adjacent.entry(name.into()).or_default();
    }

    /// Link two locations in both directions
    pub fn connect(&mut self, a: &str, b: &str) {
        let forward = self.adjacent.entry(a.to_string()).or_default();
        if !forward.iter().any(|n| n == b) {
            forward.push(b.to_string());
        }
        let backward = self.adjacent.entry(b.to_string()).or_default();
        if !backward.iter().any(|n| n == a) {
            backward.push(a.to_string());
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.adjacent.contains_key(name)
    }

    /// Get adjacent location names
    pub fn neighbours(&self, name: &str) -> &[String] {
        self.adjacent.get(name).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn are_adjacent(&self, a: &str, b: &str) -> bool {
        self.neighbours(a).iter().any(|n| n == b)
    }
}

impl Reachability for WorldTopology {
    /// Breadth-first search; unknown locations are unreachable.
    fn path_exists(&self, from: &str, to: &str) -> bool {
        if !self.contains(from) || !self.contains(to) {
            return false;
        }
        if from == to {
            return true;
        }

        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();

        visited.insert(from);
        queue.push_back(from);

        while let Some(current) = queue.pop_front() {
            for next in self.neighbours(current) {
                if next == to {
                    return true;
                }
                if visited.insert(next.as_str()) {
                    queue.push_back(next.as_str());
                }
            }
        }

        false
    }
}
