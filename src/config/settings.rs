//! Configuration settings for boxbreath.
//!
//! Settings are loaded from `~/.boxbreath/config.yaml`. Breath timings are
//! fixed and deliberately not configurable.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::BreathError;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// General settings.
    pub general: GeneralConfig,
    /// Background audio settings.
    pub audio: AudioConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct GeneralConfig {
    /// Color output setting.
    pub color: ColorSetting,
}

/// Color output setting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorSetting {
    /// Auto-detect based on terminal.
    #[default]
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

/// Background audio settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioConfig {
    /// Play ambient audio at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Looping track to play. Silent when unset or missing.
    #[serde(default)]
    pub track: Option<PathBuf>,
    /// Volume faded up to at session start (0.0 - 1.0).
    #[serde(default = "default_volume")]
    pub volume: f32,
    /// Start muted.
    #[serde(default)]
    pub muted: bool,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `boxbreath=debug`.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Write logs here. The TUI logs nowhere without it.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

// Default value functions for serde
const fn default_true() -> bool {
    true
}

const fn default_volume() -> f32 {
    0.5
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            track: None,
            volume: default_volume(),
            muted: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a specific path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed or
    /// holds out-of-range values.
    pub fn load_from_path(path: &Path) -> Result<Self, BreathError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            BreathError::Config(format!("Failed to read config file {}: {e}", path.display()))
        })?;

        let config: Self = serde_yaml::from_str(&contents).map_err(|e| {
            BreathError::Config(format!("Failed to parse config file {}: {e}", path.display()))
        })?;

        config.validate()?;
        Ok(config.resolve_relative(path))
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns an error if the volume is outside 0.0 - 1.0.
    pub fn validate(&self) -> Result<(), BreathError> {
        if !(0.0..=1.0).contains(&self.audio.volume) {
            return Err(BreathError::Config(format!(
                "audio.volume must be between 0.0 and 1.0, got {}",
                self.audio.volume
            )));
        }
        Ok(())
    }

    /// Render as YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String, BreathError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Relative track and log paths are taken relative to the config file.
    fn resolve_relative(mut self, config_path: &Path) -> Self {
        let Some(base) = config_path.parent() else {
            return self;
        };
        if let Some(track) = self.audio.track.take() {
            self.audio.track = Some(if track.is_relative() { base.join(track) } else { track });
        }
        if let Some(file) = self.logging.file.take() {
            self.logging.file = Some(if file.is_relative() { base.join(file) } else { file });
        }
        self
    }
}
