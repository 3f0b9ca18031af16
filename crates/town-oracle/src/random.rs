//! Seeded offline oracle.
//!
//! Produces short canned replies, most of which end with a number between 1
//! and 5, so a town can be run end to end without a hosted model.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::{OracleError, TextOracle};

const PHRASES: &[&str] = &[
    "Take a walk and greet the neighbours",
    "Sit down with a coffee and read",
    "Tidy up and get some work done",
    "Chat with whoever is around",
    "Head out to run a few errands",
    "Stop and think about the day ahead",
    "Help someone carry their groceries",
    "Look around for something interesting",
];

/// Share of replies that carry no number at all.
const UNRATED_PROBABILITY: f64 = 0.15;

/// Oracle backed by a seeded [`SmallRng`].
#[derive(Debug, Clone)]
pub struct RandomOracle {
    rng: SmallRng,
}

impl RandomOracle {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl TextOracle for RandomOracle {
    fn generate(&mut self, _prompt: &str) -> Result<String, OracleError> {
        let phrase = PHRASES
            .choose(&mut self.rng)
            .ok_or(OracleError::EmptyResponse)?;

        if self.rng.gen_bool(UNRATED_PROBABILITY) {
            return Ok(format!("{phrase}."));
        }
        let rating: u8 = self.rng.gen_range(1..=5);
        Ok(format!("{phrase}. I'd give it a {rating}."))
    }

    fn name(&self) -> &str {
        "random"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replies(seed: u64, count: usize) -> Vec<String> {
        let mut oracle = RandomOracle::new(seed);
        (0..count).map(|_| oracle.generate("prompt").unwrap()).collect()
    }

    #[test]
    fn test_same_seed_same_replies() {
        assert_eq!(replies(42, 50), replies(42, 50));
    }

    #[test]
    fn test_different_seeds_differ() {
        assert_ne!(replies(42, 50), replies(43, 50));
    }

    #[test]
    fn test_numbers_stay_on_scale() {
        for reply in replies(7, 200) {
            let digits: String = reply.chars().filter(|c| c.is_ascii_digit()).collect();
            if let Ok(n) = digits.parse::<u8>() {
                assert!((1..=5).contains(&n), "unexpected number in {reply}");
            }
        }
    }
}
