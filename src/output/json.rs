//! JSON output formatting for boxbreath.
//!
//! Updates are emitted one per line so `simulate -o json` can be piped into
//! line-oriented tools. Everything else is pretty-printed.

use std::path::Path;

use serde_json::json;

use crate::breath::SessionUpdate;
use crate::config::Config;
use crate::error::BreathError;
use crate::output::RunSummary;

/// Format one update as a single JSON line.
///
/// # Errors
///
/// Returns `BreathError::Json` if serialization fails.
pub fn format_update_json(update: &SessionUpdate) -> Result<String, BreathError> {
    Ok(serde_json::to_string(update)?)
}

/// Format the end-of-run summary as JSON.
///
/// # Errors
///
/// Returns `BreathError::Json` if serialization fails.
pub fn format_summary_json(summary: &RunSummary) -> Result<String, BreathError> {
    Ok(serde_json::to_string_pretty(summary)?)
}

/// Format the effective configuration as JSON.
///
/// # Errors
///
/// Returns `BreathError::Json` if serialization fails.
pub fn format_config_json(config: &Config, path: &Path) -> Result<String, BreathError> {
    let output = json!({
        "path": path,
        "exists": path.exists(),
        "config": config,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}
