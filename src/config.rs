//! Engine configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

use crate::games::tictactoe::MovePolicy;

/// Environment variable overriding [`EngineConfig::database_url`].
pub const DATABASE_URL_VAR: &str = "TICTACTOE_DATABASE_URL";

/// Environment variable overriding [`EngineConfig::strict_moves`].
pub const STRICT_MOVES_VAR: &str = "TICTACTOE_STRICT_MOVES";

/// Runtime configuration for the engine and its command-line front end.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Path of the SQLite database file.
    #[serde(default = "default_database_url")]
    database_url: String,

    /// Also require exactly one new square carrying the mover's mark.
    #[serde(default)]
    strict_moves: bool,

    /// Tracing filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    log_filter: String,
}

fn default_database_url() -> String {
    "tictactoe.db".to_string()
}

fn default_log_filter() -> String {
    "info,tictactoe_engine=debug".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            strict_moves: false,
            log_filter: default_log_filter(),
        }
    }
}

impl EngineConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text. Missing keys take defaults.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        debug!(?config, "Config parsed");
        Ok(config)
    }

    /// Loads `path` if it exists (defaults otherwise), then applies
    /// environment overrides.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = if path.as_ref().exists() {
            Self::from_file(path)?
        } else {
            info!("Config file not found, using defaults");
            Self::default()
        };
        config.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides looked up by environment variable name.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(url) = lookup(DATABASE_URL_VAR) {
            debug!(%url, "Database URL overridden");
            self.database_url = url;
        }
        if let Some(flag) = lookup(STRICT_MOVES_VAR) {
            self.strict_moves = match flag.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" | "" => false,
                other => {
                    return Err(ConfigError::new(format!(
                        "{} must be a boolean, got '{}'",
                        STRICT_MOVES_VAR, other
                    )));
                }
            };
        }
        Ok(self)
    }

    /// Overrides the database path.
    pub fn set_database_url(&mut self, url: impl Into<String>) {
        self.database_url = url.into();
    }

    /// Move validation policy selected by `strict_moves`.
    pub fn move_policy(&self) -> MovePolicy {
        if self.strict_moves {
            MovePolicy::Strict
        } else {
            MovePolicy::Lenient
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
