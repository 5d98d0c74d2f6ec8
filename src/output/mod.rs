//! Output formatting for boxbreath.
//!
//! This module renders session updates, summaries and configuration for the
//! terminal in either pretty or JSON form.

mod json;
mod pretty;

use std::path::Path;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::breath::{SessionStats, SessionUpdate};
use crate::cli::args::OutputFormat;
use crate::config::Config;
use crate::error::BreathError;

pub use json::*;
pub use pretty::*;

/// What a `run` amounted to, printed after the screen closes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub started_at: DateTime<Local>,
    pub breathed_seconds: u64,
    pub completed_cycles: u64,
    pub sessions_started: u64,
}

impl RunSummary {
    #[must_use]
    pub const fn new(started_at: DateTime<Local>, stats: SessionStats) -> Self {
        Self {
            started_at,
            breathed_seconds: stats.running_seconds,
            completed_cycles: stats.completed_cycles,
            sessions_started: stats.sessions_started,
        }
    }
}

/// Format a session update based on output format
///
/// # Errors
///
/// Returns `BreathError::Json` if JSON serialization fails.
pub fn format_update(update: &SessionUpdate, format: OutputFormat) -> Result<String, BreathError> {
    match format {
        OutputFormat::Pretty => Ok(format_update_pretty(update)),
        OutputFormat::Json => format_update_json(update),
    }
}

/// Format a run summary based on output format
///
/// # Errors
///
/// Returns `BreathError::Json` if JSON serialization fails.
pub fn format_summary(summary: &RunSummary, format: OutputFormat) -> Result<String, BreathError> {
    match format {
        OutputFormat::Pretty => Ok(format_summary_pretty(summary)),
        OutputFormat::Json => format_summary_json(summary),
    }
}

/// Format the configuration based on output format
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn format_config(config: &Config, path: &Path, format: OutputFormat) -> Result<String, BreathError> {
    match format {
        OutputFormat::Pretty => format_config_pretty(config, path),
        OutputFormat::Json => format_config_json(config, path),
    }
}
