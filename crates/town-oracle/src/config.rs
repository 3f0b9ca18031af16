//! Oracle provider selection.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{anthropic, openai};
use crate::{AnthropicOracle, Framed, OpenAiOracle, OracleError, RandomOracle, TextOracle};

/// Placeholder replaced by the prompt in [`OracleConfig::prompt_template`].
pub const PROMPT_PLACEHOLDER: &str = "{prompt}";

/// Which oracle backs the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    /// OpenAI-compatible chat completions
    #[default]
    Openai,
    /// Anthropic Messages API
    Anthropic,
    /// Seeded offline replies
    Random,
}

impl std::str::FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Provider::Openai),
            "anthropic" => Ok(Provider::Anthropic),
            "random" => Ok(Provider::Random),
            other => Err(format!("unknown oracle provider '{other}'")),
        }
    }
}

/// Oracle settings, read once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    pub provider: Provider,
    /// Model name; provider default when unset
    pub model: Option<String>,
    /// API base URL; provider default when unset
    pub base_url: Option<String>,
    /// Environment variable holding the API key; provider default when unset
    pub api_key_env: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_ms: u64,
    /// Seed for the `random` provider
    pub seed: u64,
    /// Template every prompt is wrapped in
    pub prompt_template: String,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            provider: Provider::Openai,
            model: None,
            base_url: None,
            api_key_env: None,
            temperature: 0.5,
            max_tokens: 1024,
            timeout_ms: 60_000,
            seed: 42,
            prompt_template: PROMPT_PLACEHOLDER.to_string(),
        }
    }
}

impl OracleConfig {
    /// Environment variable the API key is read from.
    pub fn api_key_env(&self) -> &str {
        match (&self.api_key_env, self.provider) {
            (Some(env), _) => env,
            (None, Provider::Anthropic) => anthropic::DEFAULT_API_KEY_ENV,
            (None, _) => openai::DEFAULT_API_KEY_ENV,
        }
    }

    fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.max(1))
    }

    fn api_key<F>(&self, getter: &mut F) -> Result<String, OracleError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let env = self.api_key_env();
        getter(env)
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| OracleError::MissingApiKey {
                env: env.to_string(),
            })
    }
}

/// Builds the configured oracle, reading API keys from the process environment.
pub fn build_oracle(config: &OracleConfig) -> Result<Box<dyn TextOracle>, OracleError> {
    build_oracle_with(config, |key| std::env::var(key).ok())
}

/// Builds the configured oracle, reading API keys through `getter`.
pub fn build_oracle_with<F>(
    config: &OracleConfig,
    mut getter: F,
) -> Result<Box<dyn TextOracle>, OracleError>
where
    F: FnMut(&str) -> Option<String>,
{
    let oracle: Box<dyn TextOracle> = match config.provider {
        Provider::Openai => {
            let base_url = config.base_url.as_deref().unwrap_or(openai::DEFAULT_BASE_URL);
            let model = config.model.as_deref().unwrap_or(openai::DEFAULT_MODEL);
            let api_key = config.api_key(&mut getter)?;
            let oracle = OpenAiOracle::new(base_url, api_key, config.timeout())?
                .with_model(model)
                .with_temperature(config.temperature)
                .with_max_tokens(config.max_tokens);
            Box::new(oracle)
        }
        Provider::Anthropic => {
            let base_url = config.base_url.as_deref().unwrap_or(anthropic::DEFAULT_BASE_URL);
            let model = config.model.as_deref().unwrap_or(anthropic::DEFAULT_MODEL);
            let oracle =
                AnthropicOracle::new(base_url, config.api_key(&mut getter)?, config.timeout())?
                    .with_model(model)
                    .with_temperature(config.temperature)
                    .with_max_tokens(config.max_tokens);
            Box::new(oracle)
        }
        Provider::Random => Box::new(RandomOracle::new(config.seed)),
    };

    tracing::info!(provider = oracle.name(), "oracle ready");

    if config.prompt_template == PROMPT_PLACEHOLDER {
        Ok(oracle)
    } else {
        Ok(Box::new(Framed::new(oracle, config.prompt_template.clone())))
    }
}
