//! Simulation Systems
//!
//! Rating extraction, the town arena and the tick driver.

pub mod perception;
pub mod rating;
pub mod tick;

pub use perception::{AgentId, AgentsByLocation, Town};
pub use rating::{ask_rating, parse_rating, RatedReply, RatingPolicy, RetryMode};
pub use tick::{Simulation, TickReport};
