//! Configuration loading for the town simulation.
//!
//! All run settings are loaded from a TOML file once at startup; every
//! section may be omitted.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use town_oracle::{OracleConfig, PROMPT_PLACEHOLDER};

use crate::components::DEFAULT_MEMORY_LIMIT;
use crate::systems::rating::{RatingPolicy, RetryMode};

/// Complete run configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TownConfig {
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// What goes into the transcript file
    #[serde(default)]
    pub log: LogToggles,
    /// What is echoed to stdout
    #[serde(default)]
    pub print: PrintToggles,
    #[serde(default)]
    pub oracle: OracleConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl TownConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: TownConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.simulation.memory_limit == 0 {
            return Err(ConfigError::Invalid(
                "simulation.memory_limit must be at least 1".to_string(),
            ));
        }
        if self.oracle.prompt_template.trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "oracle.prompt_template must not be empty (use \"{PROMPT_PLACEHOLDER}\")"
            )));
        }
        if !(0.0..=2.0).contains(&self.oracle.temperature) {
            return Err(ConfigError::Invalid(format!(
                "oracle.temperature {} is outside 0.0..=2.0",
                self.oracle.temperature
            )));
        }
        Ok(())
    }
}

/// Tick loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of ticks to run
    pub repeats: u64,
    /// Clock value during the first tick
    pub start_hour: u64,
    /// Memories kept in a recollection
    pub memory_limit: usize,
    /// What to do with a rating reply that has no number
    pub rating_retry: RetryMode,
    /// Fresh replies requested under `rating_retry = "regenerate"`
    pub regenerate_attempts: usize,
    /// Ask the oracle to summarise each location section
    pub summarize: bool,
    /// Town data file with areas and people
    pub town_file: PathBuf,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            repeats: 3,
            start_hour: 8,
            memory_limit: DEFAULT_MEMORY_LIMIT,
            rating_retry: RetryMode::Reparse,
            regenerate_attempts: 2,
            summarize: false,
            town_file: PathBuf::from("simulation_config.json"),
        }
    }
}

impl SimulationConfig {
    /// Retry policy for every rating prompt.
    ///
    /// Re-parsing always gets two extra passes.
    pub fn rating_policy(&self) -> RatingPolicy {
        let attempts = match self.rating_retry {
            RetryMode::Reparse => RatingPolicy::default().attempts,
            RetryMode::Regenerate => self.regenerate_attempts,
        };
        RatingPolicy {
            mode: self.rating_retry,
            attempts,
        }
    }
}

/// Kinds of transcript content that can be switched on and off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Plans,
    Actions,
    Memories,
    Ratings,
    Locations,
}

/// Transcript toggles. Plans and actions are on unless disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogToggles {
    pub plans: bool,
    pub actions: bool,
    pub memories: bool,
    pub ratings: bool,
    pub locations: bool,
}

impl Default for LogToggles {
    fn default() -> Self {
        Self {
            plans: true,
            actions: true,
            memories: false,
            ratings: false,
            locations: false,
        }
    }
}

impl LogToggles {
    pub fn shows(&self, topic: Topic) -> bool {
        match topic {
            Topic::Plans => self.plans,
            Topic::Actions => self.actions,
            Topic::Memories => self.memories,
            Topic::Ratings => self.ratings,
            Topic::Locations => self.locations,
        }
    }
}

/// Stdout toggles; all off by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintToggles {
    pub plans: bool,
    pub actions: bool,
    pub memories: bool,
    pub ratings: bool,
    pub locations: bool,
}

impl PrintToggles {
    pub fn shows(&self, topic: Topic) -> bool {
        match topic {
            Topic::Plans => self.plans,
            Topic::Actions => self.actions,
            Topic::Memories => self.memories,
            Topic::Ratings => self.ratings,
            Topic::Locations => self.locations,
        }
    }
}

/// Where run artefacts are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Plain-text transcript, overwritten each run
    pub transcript: PathBuf,
    /// JSONL event log, off when unset
    pub events: Option<PathBuf>,
    /// End-of-run JSON snapshot, off when unset
    pub snapshot: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            transcript: PathBuf::from("simulation_log.txt"),
            events: None,
            snapshot: None,
        }
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Generates a default configuration file content.
pub fn default_config_toml() -> String {
    r#"# Town Simulation Configuration

[simulation]
repeats = 3
start_hour = 8
memory_limit = 10
# "reparse" reads the same reply again, "regenerate" asks the oracle again
rating_retry = "reparse"
regenerate_attempts = 2
summarize = false
town_file = "simulation_config.json"

[log]
plans = true
actions = true
memories = false
ratings = false
locations = false

[print]
plans = false
actions = false
memories = false
ratings = false
locations = false

[oracle]
# openai | anthropic | random
provider = "openai"
temperature = 0.5
max_tokens = 1024
timeout_ms = 60000
seed = 42
prompt_template = "{prompt}"

[output]
transcript = "simulation_log.txt"
# events = "output/events.jsonl"
# snapshot = "output/snapshot.json"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use town_oracle::Provider;

    #[test]
    fn test_default_config() {
        let config = TownConfig::default();

        assert_eq!(config.simulation.repeats, 3);
        assert_eq!(config.simulation.start_hour, 8);
        assert_eq!(config.simulation.memory_limit, 10);
        assert!(config.log.plans && config.log.actions);
        assert!(!config.log.memories && !config.log.ratings && !config.log.locations);
        assert_eq!(config.print, PrintToggles::default());
        assert_eq!(config.output.transcript, PathBuf::from("simulation_log.txt"));
    }

    #[test]
    fn test_parse_config_from_toml() {
        let toml = r#"
            [simulation]
            repeats = 5
            rating_retry = "regenerate"
            regenerate_attempts = 4

            [print]
            actions = true

            [oracle]
            provider = "random"
            seed = 7
        "#;

        let config = TownConfig::from_str(toml).unwrap();

        assert_eq!(config.simulation.repeats, 5);
        assert_eq!(
            config.simulation.rating_policy(),
            RatingPolicy {
                mode: RetryMode::Regenerate,
                attempts: 4
            }
        );
        assert!(config.print.shows(Topic::Actions));
        assert!(!config.print.shows(Topic::Plans));
        assert_eq!(config.oracle.provider, Provider::Random);
        assert_eq!(config.oracle.seed, 7);
    }

    #[test]
    fn test_partial_log_section_keeps_other_defaults() {
        let config = TownConfig::from_str("[log]\nmemories = true\n").unwrap();

        assert!(config.log.shows(Topic::Memories));
        assert!(config.log.shows(Topic::Plans));
        assert!(!config.log.shows(Topic::Locations));
    }

    #[test]
    fn test_reparse_policy_ignores_regenerate_attempts() {
        let config = TownConfig::from_str("[simulation]\nregenerate_attempts = 9\n").unwrap();
        assert_eq!(config.simulation.rating_policy(), RatingPolicy::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = TownConfig::from_str("[simulation]\nmemory_limit = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = TownConfig::from_str("[oracle]\ntemperature = 3.5\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = TownConfig::from_str("[simulation]\nrepeats = \"many\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_config_to_toml_roundtrip() {
        let mut config = TownConfig::default();
        config.output.events = Some(PathBuf::from("events.jsonl"));

        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[simulation]"));
        assert!(toml.contains("[oracle]"));

        let parsed = TownConfig::from_str(&toml).unwrap();
        assert_eq!(parsed.output.events, Some(PathBuf::from("events.jsonl")));
        assert_eq!(parsed.log, config.log);
    }

    #[test]
    fn test_default_config_toml_parses() {
        let config = TownConfig::from_str(&default_config_toml()).unwrap();

        assert_eq!(config.simulation.repeats, 3);
        assert_eq!(config.log, LogToggles::default());
        assert_eq!(config.oracle.max_tokens, 1024);
        assert!(config.output.snapshot.is_none());
    }
}
