//! Scripted oracle for tests.
//!
//! Enable the `test-fixtures` feature to use it from other crates:
//!
//! ```ignore
//! // [dev-dependencies]
//! // town-oracle = { workspace = true, features = ["test-fixtures"] }
//!
//! use town_oracle::{ScriptedOracle, TextOracle};
//!
//! let mut oracle = ScriptedOracle::new(["first", "second"]);
//! assert_eq!(oracle.generate("a").unwrap(), "first");
//! ```

use std::collections::VecDeque;
use std::fmt;

use crate::{OracleError, TextOracle};

type Responder = Box<dyn FnMut(&str) -> Option<String>>;

/// Deterministic oracle that records every prompt it receives.
pub struct ScriptedOracle {
    responder: Responder,
    prompts: Vec<String>,
}

impl ScriptedOracle {
    /// Replies with `responses` in order, then fails with [`OracleError::Exhausted`].
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut queue: VecDeque<String> = responses.into_iter().map(Into::into).collect();
        Self::from_fn(move |_| queue.pop_front())
    }

    /// Always replies with `response`.
    pub fn repeating(response: impl Into<String>) -> Self {
        let response = response.into();
        Self::from_fn(move |_| Some(response.clone()))
    }

    /// Replies with whatever `responder` returns for the prompt; `None` fails.
    pub fn from_fn(responder: impl FnMut(&str) -> Option<String> + 'static) -> Self {
        Self {
            responder: Box::new(responder),
            prompts: Vec::new(),
        }
    }

    /// Every prompt received so far, oldest first.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn call_count(&self) -> usize {
        self.prompts.len()
    }
}

impl fmt::Debug for ScriptedOracle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptedOracle")
            .field("prompts", &self.prompts.len())
            .finish()
    }
}

impl TextOracle for ScriptedOracle {
    fn generate(&mut self, prompt: &str) -> Result<String, OracleError> {
        self.prompts.push(prompt.to_string());
        (self.responder)(prompt).ok_or_else(|| {
            let preview: String = prompt.chars().take(60).collect();
            OracleError::Exhausted(preview)
        })
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
