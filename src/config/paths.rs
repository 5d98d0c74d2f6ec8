//! Path resolution for boxbreath configuration and log files.
//!
//! Everything lives in `~/.boxbreath/`:
//! - `config.yaml` - Configuration file (read only; never written back)
//! - `boxbreath.log` - Default log file for the TUI when file logging is on

use std::path::PathBuf;

use crate::error::BreathError;

/// Paths to boxbreath files.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root directory: `~/.boxbreath/`
    pub root: PathBuf,
    /// Config file: `~/.boxbreath/config.yaml`
    pub config_file: PathBuf,
    /// Log file: `~/.boxbreath/boxbreath.log`
    pub log_file: PathBuf,
}

impl Paths {
    /// Create paths based on the user's home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, BreathError> {
        let home = std::env::var("HOME")
            .map_err(|_| BreathError::Config("Could not determine home directory".to_string()))?;

        Ok(Self::with_root(PathBuf::from(home).join(".boxbreath")))
    }

    /// Create paths with a custom root directory (useful for testing).
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            log_file: root.join("boxbreath.log"),
            root,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_with_root() {
        let root = PathBuf::from("/tmp/test-boxbreath");
        let paths = Paths::with_root(root.clone());

        assert_eq!(paths.root, root);
        assert_eq!(paths.config_file, root.join("config.yaml"));
        assert_eq!(paths.log_file, root.join("boxbreath.log"));
    }
}
