//! Text-generation oracles for the town simulation.
//!
//! An oracle maps a prompt to a generated reply. Agents use it for every
//! judgment call: plans, actions and the ratings they parse from free text.
//!
//! # Providers
//!
//! - [`OpenAiOracle`]: any OpenAI-compatible `/chat/completions` endpoint
//! - [`AnthropicOracle`]: the Anthropic Messages API
//! - [`RandomOracle`]: seeded offline replies for dry runs
//! - [`Framed`]: wraps another oracle and applies a prompt template
//!
//! Which one is used is decided by [`OracleConfig`] via [`build_oracle`].

pub mod anthropic;
pub mod config;
pub mod error;
pub mod framed;
pub mod openai;
pub mod random;
#[cfg(any(test, feature = "test-fixtures"))]
pub mod scripted;

pub use anthropic::AnthropicOracle;
pub use config::{build_oracle, OracleConfig, Provider, PROMPT_PLACEHOLDER};
pub use error::OracleError;
pub use framed::Framed;
pub use openai::OpenAiOracle;
pub use random::RandomOracle;
#[cfg(any(test, feature = "test-fixtures"))]
pub use scripted::ScriptedOracle;

/// Maps a prompt to generated text.
///
/// Replies carry no guaranteed format and may be arbitrarily long or short.
/// Calls block until the provider answers.
pub trait TextOracle {
    /// Generates a reply for `prompt`.
    fn generate(&mut self, prompt: &str) -> Result<String, OracleError>;

    /// Provider name, for logs.
    fn name(&self) -> &str;
}

impl<T: TextOracle + ?Sized> TextOracle for Box<T> {
    fn generate(&mut self, prompt: &str) -> Result<String, OracleError> {
        (**self).generate(prompt)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<T: TextOracle + ?Sized> TextOracle for &mut T {
    fn generate(&mut self, prompt: &str) -> Result<String, OracleError> {
        (**self).generate(prompt)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
