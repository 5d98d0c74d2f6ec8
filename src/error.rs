//! Error types for boxbreath.
//!
//! Audio failures have their own type (`AudioError`) and stop at the audio
//! synchronizer; nothing here wraps them.

use thiserror::Error;

/// Errors surfaced by the CLI and the terminal front end.
#[derive(Error, Debug)]
pub enum BreathError {
    /// Configuration could not be resolved, read or parsed.
    #[error("Config error: {0}")]
    Config(String),

    /// Terminal setup, drawing or input failed.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// A command-line value was out of range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl BreathError {
    /// Process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument(_) => 2,
            Self::Config(_) | Self::Yaml(_) => 3,
            Self::Terminal(_) | Self::Io(_) | Self::Json(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = BreathError::Config("missing home".to_string());
        assert_eq!(err.to_string(), "Config error: missing home");

        let err = BreathError::InvalidArgument("volume 1.5".to_string());
        assert_eq!(err.to_string(), "Invalid argument: volume 1.5");
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(BreathError::InvalidArgument(String::new()).exit_code(), 2);
        assert_eq!(BreathError::Config(String::new()).exit_code(), 3);
        assert_eq!(BreathError::Terminal(String::new()).exit_code(), 1);
    }
}
