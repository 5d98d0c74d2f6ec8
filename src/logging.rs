//! Tracing subscriber setup.
//!
//! The filter comes from `BOXBREATH_LOG` when set, otherwise from `-v`
//! flags, otherwise from `logging.level` in the config file.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{LoggingConfig, Paths};
use crate::error::BreathError;

/// Environment variable holding a filter directive.
pub const LOG_ENV: &str = "BOXBREATH_LOG";

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Append to a file. Used by the TUI so logs never touch the screen.
    File(PathBuf),
    Off,
}

impl LogTarget {
    /// The TUI writes to the configured file. With `-v` and no file it
    /// falls back to the default log file; otherwise it logs nowhere.
    #[must_use]
    pub fn for_tui(config: &LoggingConfig, verbose: u8, paths: &Paths) -> Self {
        match &config.file {
            Some(file) => Self::File(file.clone()),
            None if verbose > 0 => Self::File(paths.log_file.clone()),
            None => Self::Off,
        }
    }
}

/// Pick the filter directive.
#[must_use]
pub fn filter_directive(env: Option<&str>, verbose: u8, configured: &str) -> String {
    if let Some(directive) = env.filter(|d| !d.trim().is_empty()) {
        return directive.to_string();
    }
    match verbose {
        0 => configured.to_string(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns an error if the directive is malformed, the log file cannot be
/// opened, or a subscriber is already installed.
pub fn init(directive: &str, target: &LogTarget) -> Result<(), BreathError> {
    let filter = EnvFilter::try_new(directive)
        .map_err(|e| BreathError::Config(format!("Invalid log filter '{directive}': {e}")))?;

    let installed = match target {
        LogTarget::Off => return Ok(()),
        LogTarget::Stderr => fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_level(true)
            .with_writer(std::io::stderr)
            .try_init(),
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
    };

    installed.map_err(|e| BreathError::Config(format!("Failed to install logger: {e}")))
}
