//! Layered configuration
//!
//! Built-in defaults, then `lairkeep.toml` (or the file named by
//! `LAIRKEEP_CONFIG`), then `LAIRKEEP_*` environment variables.

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Default configuration file in the working directory
pub const CONFIG_FILE: &str = "lairkeep.toml";

/// Environment variable naming an alternate configuration file
pub const CONFIG_ENV: &str = "LAIRKEEP_CONFIG";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Figment(Box::new(err))
    }
}

/// Tool configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Bestiary document used by `list` and `encounter add`
    pub bestiary_path: Option<PathBuf>,
    /// Where the encounter snapshot lives
    pub snapshot_path: PathBuf,
    /// Seed for every dice roll in one invocation
    pub rng_seed: Option<u64>,
    /// Fallback tracing filter when RUST_LOG is unset
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bestiary_path: None,
            snapshot_path: PathBuf::from("encounter.json"),
            rng_seed: None,
            log_filter: "lairkeep=info".to_string(),
        }
    }
}

impl Config {
    /// Defaults, config file and environment, in increasing priority
    pub fn figment() -> Figment {
        let file = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));

        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed("LAIRKEEP_").ignore(&["config"]))
    }

    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment())
    }

    /// Extract and validate from any figment
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Config = figment.extract()?;
        if config.snapshot_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("snapshot_path is empty".to_string()));
        }
        Ok(config)
    }
}
