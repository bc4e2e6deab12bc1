//! Configuration types for the deepdish engine.
//!
//! This module defines the configuration schema: the answer service
//! endpoint, reveal pacing, the user profile and the optional location
//! used for city lookup.

use crate::answer::DEFAULT_ENDPOINT;
use crate::geo::{Coordinates, DEFAULT_GEOCODE_URL};
use crate::profile::UserProfile;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Directory (relative to the working directory) holding config and logs.
pub const DEEPDISH_DIR: &str = ".deepdish";

/// Config file name inside [`DEEPDISH_DIR`].
pub const CONFIG_FILE: &str = "config.json";

/// Main configuration for deepdish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the answer service.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Pacing of the incremental reveal.
    #[serde(default)]
    pub reveal: RevealConfig,

    /// Details sent alongside each query.
    #[serde(default)]
    pub profile: UserProfile,

    /// Where the user is, for city lookup.
    #[serde(default)]
    pub location: Option<Coordinates>,

    /// Reverse-geocoding endpoint.
    #[serde(default = "default_geocode_url")]
    pub geocode_url: String,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.into()
}

fn default_geocode_url() -> String {
    DEFAULT_GEOCODE_URL.into()
}

/// Pacing of the word-chunk reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealConfig {
    /// Whether answers are revealed progressively at all.
    #[serde(default = "default_reveal_enabled")]
    pub enabled: bool,

    /// Milliseconds between reveal ticks.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    /// Fewest words revealed per tick.
    #[serde(default = "default_min_chunk")]
    pub min_chunk: usize,

    /// Most words revealed per tick.
    #[serde(default = "default_max_chunk")]
    pub max_chunk: usize,
}

fn default_reveal_enabled() -> bool {
    true
}

fn default_tick_ms() -> u64 {
    75
}

fn default_min_chunk() -> usize {
    1
}

fn default_max_chunk() -> usize {
    4
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            enabled: default_reveal_enabled(),
            tick_ms: default_tick_ms(),
            min_chunk: default_min_chunk(),
            max_chunk: default_max_chunk(),
        }
    }
}

impl RevealConfig {
    /// Reveal disabled: answers are committed as soon as they arrive.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Interval between ticks (never zero).
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }

    /// Inclusive chunk bounds, repaired so that `1 <= min <= max`.
    pub fn chunk_bounds(&self) -> (usize, usize) {
        let min = self.min_chunk.max(1);
        (min, self.max_chunk.max(min))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            reveal: RevealConfig::default(),
            profile: UserProfile::default(),
            location: None,
            geocode_url: default_geocode_url(),
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        let mut config: Self = serde_json::from_str(&content).map_err(ConfigError::Parse)?;
        config.profile = config.profile.normalized();
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is missing.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }

    /// Default config path under `root`.
    pub fn default_path(root: &Path) -> std::path::PathBuf {
        root.join(DEEPDISH_DIR).join(CONFIG_FILE)
    }
}

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading or writing config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing config JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing config to JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
}
