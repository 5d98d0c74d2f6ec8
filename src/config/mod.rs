//! Configuration management for boxbreath.
//!
//! This module handles loading configuration from `~/.boxbreath/`.

mod paths;
mod settings;

pub use paths::Paths;
pub use settings::{AudioConfig, ColorSetting, Config, GeneralConfig, LoggingConfig};
