//! Rating Extraction
//!
//! Turns free-form oracle replies into ratings on the 0–5 scale.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use town_events::Rating;
use town_oracle::{OracleError, TextOracle};

static DIGIT_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+").expect("digit pattern compiles"));

/// Extracts the smallest number mentioned in `text`.
///
/// Every contiguous run of ASCII digits is read as an integer and the minimum
/// is returned. A reply that restates the scale ("1 to 5, I'd say 4") therefore
/// reads as 1. Runs too long for `u64` saturate. Returns `None` when `text` has
/// no digits.
pub fn parse_rating(text: &str) -> Option<u64> {
    DIGIT_RUNS
        .find_iter(text)
        .map(|run| run.as_str().parse::<u64>().unwrap_or(u64::MAX))
        .min()
}

/// What to do when a reply has no number in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RetryMode {
    /// Parse the same reply again. Re-parsing identical text always yields
    /// the same result, so this amounts to "default to 0".
    #[default]
    Reparse,
    /// Ask the oracle again with the same prompt.
    Regenerate,
}

/// Bounded retry applied to every rating prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingPolicy {
    pub mode: RetryMode,
    /// Extra attempts after the first parse
    pub attempts: usize,
}

impl Default for RatingPolicy {
    fn default() -> Self {
        Self {
            mode: RetryMode::Reparse,
            attempts: 2,
        }
    }
}

/// A parsed rating and the reply it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatedReply {
    pub rating: Rating,
    pub response: String,
    /// Whether any number was found
    pub parsed: bool,
}

/// Asks the oracle `prompt` and reads a rating from the reply.
///
/// Unparseable replies fall back to [`Rating::ZERO`] once the policy's extra
/// attempts are used up. Only oracle failures are returned as errors.
pub fn ask_rating(
    oracle: &mut dyn TextOracle,
    prompt: &str,
    policy: RatingPolicy,
) -> Result<RatedReply, OracleError> {
    let mut response = oracle.generate(prompt)?;
    let mut value = parse_rating(&response);

    let mut attempt = 0;
    while value.is_none() && attempt < policy.attempts {
        if policy.mode == RetryMode::Regenerate {
            response = oracle.generate(prompt)?;
        }
        value = parse_rating(&response);
        attempt += 1;
    }

    match value {
        Some(value) => Ok(RatedReply {
            rating: Rating::clamped(value),
            response,
            parsed: true,
        }),
        None => {
            tracing::warn!(response = %response, "no rating in reply, using 0");
            Ok(RatedReply {
                rating: Rating::ZERO,
                response,
                parsed: false,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use town_oracle::ScriptedOracle;

    #[test]
    fn test_minimum_number_wins() {
        assert_eq!(parse_rating("rate 3 out of 5"), Some(3));
        assert_eq!(parse_rating("On a scale of 1 to 5, I'd say 4"), Some(1));
        assert_eq!(parse_rating("5"), Some(5));
        assert_eq!(parse_rating("Rating: 04/5"), Some(4));
    }

    #[test]
    fn test_no_digits_is_none() {
        assert_eq!(parse_rating("no numbers here"), None);
        assert_eq!(parse_rating(""), None);
        assert_eq!(parse_rating("five, maybe four"), None);
    }

    #[test]
    fn test_non_ascii_digits_are_ignored() {
        assert_eq!(parse_rating("٣"), None);
        assert_eq!(parse_rating("٣ or 2"), Some(2));
    }

    #[test]
    fn test_huge_numbers_saturate() {
        assert_eq!(parse_rating("99999999999999999999999999"), Some(u64::MAX));
        assert_eq!(parse_rating("99999999999999999999999999 and 7"), Some(7));
    }

    #[test]
    fn test_ask_rating_clamps() {
        let mut oracle = ScriptedOracle::new(["I care about this 10 out of 10"]);
        let reply = ask_rating(&mut oracle, "rate it", RatingPolicy::default()).unwrap();

        assert_eq!(reply.rating, Rating::MAX);
        assert!(reply.parsed);
    }

    #[test]
    fn test_reparse_never_calls_oracle_again() {
        let mut oracle = ScriptedOracle::new(["not sure", "4"]);
        let reply = ask_rating(&mut oracle, "rate it", RatingPolicy::default()).unwrap();

        assert_eq!(reply.rating, Rating::ZERO);
        assert_eq!(reply.response, "not sure");
        assert!(!reply.parsed);
        assert_eq!(oracle.call_count(), 1);
    }

    #[test]
    fn test_regenerate_asks_again() {
        let mut oracle = ScriptedOracle::new(["not sure", "hmm", "4"]);
        let policy = RatingPolicy {
            mode: RetryMode::Regenerate,
            attempts: 2,
        };
        let reply = ask_rating(&mut oracle, "rate it", policy).unwrap();

        assert_eq!(reply.rating.value(), 4);
        assert_eq!(reply.response, "4");
        assert_eq!(oracle.call_count(), 3);
    }

    #[test]
    fn test_regenerate_gives_up_after_attempts() {
        let mut oracle = ScriptedOracle::repeating("no idea");
        let policy = RatingPolicy {
            mode: RetryMode::Regenerate,
            attempts: 2,
        };
        let reply = ask_rating(&mut oracle, "rate it", policy).unwrap();

        assert_eq!(reply.rating, Rating::ZERO);
        assert_eq!(oracle.call_count(), 3);
    }

    #[test]
    fn test_oracle_failure_propagates() {
        let mut oracle = ScriptedOracle::new(Vec::<String>::new());
        let result = ask_rating(&mut oracle, "rate it", RatingPolicy::default());
        assert!(matches!(result, Err(OracleError::Exhausted(_))));
    }
}
