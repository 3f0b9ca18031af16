//! Simulation Timestamp Types
//!
//! Simulation time is a monotonically increasing hour counter plus the index of
//! the tick that produced it.
//!
//! # Example
//!
//! ```
//! use town_events::{Hour, SimTimestamp};
//!
//! let ts = SimTimestamp::new(2, Hour(10));
//! assert_eq!(ts.tick, 2);
//! assert_eq!(ts.hour.to_string(), "10:00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// A simulated hour of the day.
///
/// Hours are never wrapped at midnight: a run that starts at 22 continues with
/// 23, 24, 25, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hour(pub u64);

impl Hour {
    /// Returns the following hour.
    pub fn next(self) -> Self {
        Hour(self.0 + 1)
    }
}

impl fmt::Display for Hour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:00", self.0)
    }
}

/// A point in simulation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimTimestamp {
    /// Zero-based tick index within the run.
    pub tick: u64,
    /// Hour of the simulated clock during that tick.
    pub hour: Hour,
}

impl SimTimestamp {
    /// Creates a new SimTimestamp.
    pub fn new(tick: u64, hour: Hour) -> Self {
        Self { tick, hour }
    }

    /// Creates the timestamp of the first tick of a run.
    pub fn start(hour: Hour) -> Self {
        Self { tick: 0, hour }
    }

    /// Moves to the next tick; the hour advances with it.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.hour = self.hour.next();
    }
}

impl fmt::Display for SimTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tick {} ({})", self.tick, self.hour)
    }
}
