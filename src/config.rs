//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\discography-player\config.toml
//! - macOS: ~/Library/Application Support/discography-player/config.toml
//! - Linux: ~/.config/discography-player/config.toml
//!
//! The file is optional and read once at startup. Nothing is written back:
//! volume and mode changes only live for the current session.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the discography comes from
    pub catalog: CatalogConfig,

    /// Playback behaviour
    pub playback: PlaybackConfig,
}

/// Catalog source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Path or http(s) URL of the discography JSON document
    pub source: String,

    /// Base URL prepended to relative asset paths (empty = catalog location)
    pub data_base_url: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: "data/discography.json".to_string(),
            data_base_url: String::new(),
        }
    }
}

/// Playback settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Initial volume level (0.0 - 1.0)
    pub volume: f32,

    /// Include shuffle in the playback mode cycle
    pub shuffle_enabled: bool,

    /// Seconds after which "previous" restarts the current track instead
    pub restart_threshold_secs: u64,

    /// The two encodings swapped by the one-shot format retry
    pub alternate_formats: [String; 2],
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            volume: 0.7,
            shuffle_enabled: true,
            restart_threshold_secs: 3,
            alternate_formats: ["mp3".to_string(), "wav".to_string()],
        }
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("discography-player"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the default location.
///
/// Returns default config if the file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };

    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    load_or_default(&path)
}

/// Load configuration from an explicit path, falling back to defaults.
pub fn load_or_default(path: &Path) -> Config {
    match load_from(path) {
        Ok(config) => {
            tracing::info!("Loaded config from {:?}", path);
            config
        }
        Err(e) => {
            tracing::error!("{}", e);
            tracing::warn!("Using default configuration");
            Config::default()
        }
    }
}

/// Read and parse a config file.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
    let config: Config =
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
    Ok(config.normalized())
}

impl Config {
    /// Clamp values that have a fixed valid range.
    fn normalized(mut self) -> Self {
        if !(0.0..=1.0).contains(&self.playback.volume) {
            tracing::warn!(
                volume = self.playback.volume,
                "Configured volume out of range, clamping"
            );
            self.playback.volume = self.playback.volume.clamp(0.0, 1.0);
        }
        self
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("Failed to parse config file {0}: {1}")]
    Parse(PathBuf, toml::de::Error),
}

// ============================================================================
// Tests
// ============================================================================
