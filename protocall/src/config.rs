//! Interpreter configuration loaded from TOML

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default recursion limit for user function calls
pub const DEFAULT_MAX_CALL_DEPTH: usize = 10_000;

/// Remaining stack below which evaluation grows the stack
pub const DEFAULT_STACK_RED_ZONE: usize = 128 * 1024;

/// Size of each stack extension
pub const DEFAULT_STACK_GROW_SIZE: usize = 4 * 1024 * 1024;

/// Runtime limits and CLI settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum number of nested user function calls
    pub max_call_depth: usize,
    /// `stacker` red zone in bytes
    pub stack_red_zone: usize,
    /// `stacker` growth step in bytes
    pub stack_grow_size: usize,
    /// REPL history file name, relative to the home directory
    pub history_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            stack_red_zone: DEFAULT_STACK_RED_ZONE,
            stack_grow_size: DEFAULT_STACK_GROW_SIZE,
            history_file: ".protocall_history".to_string(),
        }
    }
}

/// Failure to load a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading configuration {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing configuration {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

impl Config {
    /// Parse configuration text; absent keys take their defaults
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load configuration from disk
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Serialize back to TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
