//! Simulator configuration management.
//!
//! Consolidates all environment variable reads; command line flags take
//! precedence over the environment.

use holdem_bot::bot::{BotDecisionConfig, BotDifficulty, SchedulerConfig};
use std::path::PathBuf;

/// Complete simulator configuration
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Hands to play before stopping
    pub hands: u32,
    /// Bot seats at the table
    pub players: usize,
    /// Starting stack per seat
    pub starting_chips: u32,
    pub small_blind: u32,
    pub big_blind: u32,
    /// Delay between paced announcements
    pub action_delay_ms: u64,
    /// Seed for dealing and bot randomness; random when absent
    pub seed: Option<u64>,
    pub difficulty: BotDifficulty,
    /// JSON file overriding the difficulty preset
    pub decision_config: Option<PathBuf>,
}

/// Values given on the command line
#[derive(Debug, Default)]
pub struct Overrides {
    pub hands: Option<u32>,
    pub players: Option<usize>,
    pub action_delay_ms: Option<u64>,
    pub seed: Option<u64>,
    pub difficulty: Option<BotDifficulty>,
    pub decision_config: Option<PathBuf>,
}

impl SimConfig {
    /// Load configuration from `HB_SIM_*` environment variables
    ///
    /// # Errors
    ///
    /// Returns error if a variable is present but cannot be parsed
    pub fn from_env(overrides: Overrides) -> Result<Self, ConfigError> {
        let difficulty = match overrides.difficulty {
            Some(difficulty) => difficulty,
            None => match std::env::var("HB_SIM_DIFFICULTY") {
                Ok(value) => value.parse().map_err(|_| ConfigError::Invalid {
                    var: "HB_SIM_DIFFICULTY".to_string(),
                    reason: format!("Unknown difficulty '{value}' (easy, standard or tag)"),
                })?,
                Err(_) => BotDifficulty::Standard,
            },
        };

        let seed = match overrides.seed {
            Some(seed) => Some(seed),
            None => parse_env_opt("HB_SIM_SEED")?,
        };

        Ok(SimConfig {
            hands: overrides
                .hands
                .map_or_else(|| parse_env_or("HB_SIM_HANDS", 10), Ok)?,
            players: overrides
                .players
                .map_or_else(|| parse_env_or("HB_SIM_PLAYERS", 6), Ok)?,
            starting_chips: parse_env_or("HB_SIM_STARTING_CHIPS", 2000)?,
            small_blind: parse_env_or("HB_SIM_SMALL_BLIND", 10)?,
            big_blind: parse_env_or("HB_SIM_BIG_BLIND", 20)?,
            action_delay_ms: overrides.action_delay_ms.map_or_else(
                || {
                    parse_env_or(
                        "HB_SIM_ACTION_DELAY_MS",
                        SchedulerConfig::default().action_delay.as_millis() as u64,
                    )
                },
                Ok,
            )?,
            seed,
            difficulty,
            decision_config: overrides
                .decision_config
                .or_else(|| std::env::var("HB_SIM_CONFIG").ok().map(PathBuf::from)),
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(2..=10).contains(&self.players) {
            return Err(ConfigError::Invalid {
                var: "HB_SIM_PLAYERS".to_string(),
                reason: format!("Must be between 2 and 10, got {}", self.players),
            });
        }

        if self.small_blind == 0 {
            return Err(ConfigError::Invalid {
                var: "HB_SIM_SMALL_BLIND".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.big_blind <= self.small_blind {
            return Err(ConfigError::Invalid {
                var: "HB_SIM_BIG_BLIND".to_string(),
                reason: format!("Must be greater than small blind ({})", self.small_blind),
            });
        }

        if self.starting_chips < self.big_blind {
            return Err(ConfigError::Invalid {
                var: "HB_SIM_STARTING_CHIPS".to_string(),
                reason: format!("Must cover the big blind ({})", self.big_blind),
            });
        }

        Ok(())
    }

    /// Bot decision config: the JSON file when given, else the preset
    pub fn decision(&self) -> anyhow::Result<BotDecisionConfig> {
        match &self.decision_config {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|e| {
                    anyhow::anyhow!("Failed to read bot config {}: {}", path.display(), e)
                })?;
                Ok(BotDecisionConfig::from_json_str(&json)?)
            }
            None => Ok(BotDecisionConfig::for_difficulty(self.difficulty)),
        }
    }

    pub fn scheduler(&self) -> SchedulerConfig {
        SchedulerConfig::with_delay_ms(self.action_delay_ms)
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    Ok(parse_env_opt(key)?.unwrap_or(default))
}

fn parse_env_opt<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
{
    match std::env::var(key) {
        Ok(value) => value.parse().map(Some).map_err(|_| ConfigError::Invalid {
            var: key.to_string(),
            reason: format!("Cannot parse '{value}'"),
        }),
        Err(_) => Ok(None),
    }
}
