//! Board configuration.
//!
//! Loaded from TOML, every field optional:
//!
//! ```
//! use ranked_board::BoardConfig;
//!
//! let config = BoardConfig::from_toml_str(r#"
//!     name = "weekly-xp"
//!     max_level = 12
//!     p_factor = 0.5
//!     seed = 7
//! "#).unwrap();
//!
//! assert_eq!(config.name, "weekly-xp");
//! assert_eq!(config.max_level, 12);
//! assert_eq!(config.seed, Some(7));
//! ```

use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::level::DEFAULT_MAX_LEVEL;
use crate::level::DEFAULT_P_FACTOR;
use crate::level::LevelGenerator;
use crate::level::MAX_LEVEL_CEILING;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Tuning for one board.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoardConfig {
    /// Name attached to this board's log events.
    pub name: String,

    /// Tower height ceiling, `1..=32`.
    pub max_level: usize,

    /// Probability of promoting a node one more level, `[0, 1)`.
    pub p_factor: f64,

    /// Fixed level seed. `None` seeds from the OS entropy source.
    pub seed: Option<u64>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        return BoardConfig {
            name: "default".to_string(),
            max_level: DEFAULT_MAX_LEVEL,
            p_factor: DEFAULT_P_FACTOR,
            seed: None,
        };
    }
}

impl BoardConfig {
    pub fn new() -> Self {
        return Self::default();
    }

    /// Loads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        return Self::from_toml_str(&contents);
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: BoardConfig = toml::from_str(s)?;
        config.validate()?;
        return Ok(config);
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        return self;
    }

    pub fn with_max_level(mut self, max_level: usize) -> Self {
        self.max_level = max_level;
        return self;
    }

    pub fn with_p_factor(mut self, p_factor: f64) -> Self {
        self.p_factor = p_factor;
        return self;
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        return self;
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_LEVEL_CEILING).contains(&self.max_level) {
            return Err(ConfigError::Invalid(format!(
                "max_level must be in 1..={}, got {}",
                MAX_LEVEL_CEILING, self.max_level
            )));
        }
        if !self.p_factor.is_finite() || !(0.0..1.0).contains(&self.p_factor) {
            return Err(ConfigError::Invalid(format!(
                "p_factor must be in [0, 1), got {}",
                self.p_factor
            )));
        }
        return Ok(());
    }

    /// Level generator for a board built from this config.
    pub(crate) fn level_generator(&self) -> LevelGenerator {
        return match self.seed {
            Some(seed) => LevelGenerator::with_seed(self.max_level, self.p_factor, seed),
            None => LevelGenerator::from_entropy(self.max_level, self.p_factor),
        };
    }
}
