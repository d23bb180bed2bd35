//! Controller configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default in-app path prefix of room views.
pub const DEFAULT_ROOM_PATH_PREFIX: &str = "/room/";

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Settings for the game controller.
///
/// Every field has a default, so a partial JSON document is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Message shown before leaving a running game.
    pub confirmation: String,
    /// Identifier of the element the game renders into.
    pub render_element: String,
    /// Audio cue stopped when leaving the game.
    pub victory_cue: String,
    /// Path prefix of room views.
    pub room_path_prefix: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            confirmation: "Are you sure you want to leave the game?".to_string(),
            render_element: "render".to_string(),
            victory_cue: "win".to_string(),
            room_path_prefix: DEFAULT_ROOM_PATH_PREFIX.to_string(),
        }
    }
}

impl ControllerConfig {
    /// Parse a configuration from JSON.
    ///
    /// # Errors
    /// Returns error if the document is not valid JSON for this type.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration file.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}
