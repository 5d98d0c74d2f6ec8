//! Configuration inspection.

use std::path::Path;

use crate::cli::args::{ConfigCommands, OutputFormat};
use crate::config::Config;
use crate::error::BreathError;
use crate::output::format_config;

/// Execute config subcommands.
///
/// # Errors
///
/// Returns an error if output formatting fails.
pub fn config(
    cmd: ConfigCommands,
    config: &Config,
    path: &Path,
    format: OutputFormat,
) -> Result<String, BreathError> {
    match cmd {
        ConfigCommands::Show => format_config(config, path, format),
        ConfigCommands::Path => match format {
            OutputFormat::Pretty => Ok(path.display().to_string()),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(
                &serde_json::json!({ "path": path, "exists": path.exists() }),
            )?),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_pretty() {
        let path = Path::new("/tmp/boxbreath/config.yaml");
        let out = config(ConfigCommands::Path, &Config::default(), path, OutputFormat::Pretty).unwrap();
        assert_eq!(out, "/tmp/boxbreath/config.yaml");
    }

    #[test]
    fn test_config_show_pretty_mentions_defaults() {
        colored::control::set_override(false);
        let path = Path::new("/nonexistent/config.yaml");
        let out = config(ConfigCommands::Show, &Config::default(), path, OutputFormat::Pretty).unwrap();
        assert!(out.contains("not found, using defaults"));
        assert!(out.contains("volume: 0.5"));
    }
}
