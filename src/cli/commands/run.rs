//! The interactive breathing screen.

use std::path::PathBuf;

use chrono::Local;
use tracing::info;

use crate::audio::{open_track, AudioSync};
use crate::breath::BreathSession;
use crate::cli::args::{OutputFormat, RunArgs};
use crate::config::AudioConfig;
use crate::error::BreathError;
use crate::output::{format_summary, RunSummary};
use crate::tui;

/// Audio settings after merging flags over the config file.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSettings {
    pub track: Option<PathBuf>,
    pub volume: f32,
    pub muted: bool,
}

impl AudioSettings {
    /// Merge `args` over `config`. `None` means audio is switched off.
    ///
    /// # Errors
    ///
    /// Returns an error if `--volume` is outside 0.0 - 1.0.
    pub fn resolve(args: &RunArgs, config: &AudioConfig) -> Result<Option<Self>, BreathError> {
        if let Some(volume) = args.volume {
            if !(0.0..=1.0).contains(&volume) {
                return Err(BreathError::InvalidArgument(format!(
                    "--volume must be between 0.0 and 1.0, got {volume}"
                )));
            }
        }

        if args.no_audio || !config.enabled {
            return Ok(None);
        }

        Ok(Some(Self {
            track: args.track.clone().or_else(|| config.track.clone()),
            volume: args.volume.unwrap_or(config.volume),
            muted: args.muted || config.muted,
        }))
    }
}

/// Execute the run command: open the screen, then summarize.
///
/// # Errors
///
/// Returns an error if the terminal cannot be driven or formatting fails.
pub fn run(args: &RunArgs, config: &AudioConfig, format: OutputFormat) -> Result<String, BreathError> {
    let session = match AudioSettings::resolve(args, config)? {
        Some(settings) => {
            info!(track = ?settings.track, volume = settings.volume, "audio enabled");
            let track = open_track(settings.track.as_deref());
            BreathSession::with_audio(AudioSync::new(track, settings.volume, settings.muted))
        }
        None => {
            info!("audio disabled");
            BreathSession::new()
        }
    };

    let started_at = Local::now();
    let stats = tui::run(session)?;
    format_summary(&RunSummary::new(started_at, stats), format)
}
