//! Headless session on a virtual clock.

use std::time::Duration;

use colored::Colorize;
use tracing::debug;

use crate::audio::{AudioSync, SilentTrack};
use crate::breath::{BreathSession, SessionUpdate};
use crate::cli::args::{OutputFormat, SimulateArgs};
use crate::config::Config;
use crate::error::BreathError;
use crate::output::format_update;

/// Clock resolution, matching the fade cadence.
const STEP: Duration = Duration::from_millis(100);

/// Drive a session for `args.seconds` virtual seconds and collect every
/// published update.
///
/// # Errors
///
/// Returns an error if the volume is out of range or the restart precedes
/// the stop.
pub fn simulate_updates(
    args: &SimulateArgs,
    config: &Config,
) -> Result<(BreathSession, Vec<SessionUpdate>), BreathError> {
    validate(args)?;

    let mut session = if args.with_audio {
        let volume = args.volume.unwrap_or(config.audio.volume);
        let sync = AudioSync::new(Box::new(SilentTrack::new()), volume, config.audio.muted);
        let mut session = BreathSession::with_audio(sync);
        session.user_gesture();
        session
    } else {
        BreathSession::new()
    };

    let rx = session.subscribe();
    let total = Duration::from_secs(args.seconds);
    let stop_at = args.stop_at.map(Duration::from_secs);
    let restart_at = args.restart_at.map(Duration::from_secs);

    session.start();
    let mut t = Duration::ZERO;
    while t < total {
        t += STEP;
        session.advance_to(t);
        if stop_at == Some(t) {
            debug!(at = ?t, "scripted stop");
            session.stop();
        }
        if restart_at == Some(t) {
            debug!(at = ?t, "scripted restart");
            session.start();
        }
    }

    let updates = rx.try_iter().collect();
    Ok((session, updates))
}

/// Execute the simulate command.
///
/// # Errors
///
/// Returns an error if the arguments are invalid or formatting fails.
pub fn simulate(
    args: &SimulateArgs,
    config: &Config,
    format: OutputFormat,
) -> Result<String, BreathError> {
    let (session, updates) = simulate_updates(args, config)?;

    let mut lines = updates
        .iter()
        .map(|update| format_update(update, format))
        .collect::<Result<Vec<_>, _>>()?;

    if format == OutputFormat::Pretty {
        let snapshot = session.snapshot();
        lines.push(
            format!(
                "{} updates, ended {}, {} cycle{} this session",
                updates.len(),
                snapshot.stage,
                snapshot.completed_cycles,
                if snapshot.completed_cycles == 1 { "" } else { "s" }
            )
            .dimmed()
            .to_string(),
        );
    }

    Ok(lines.join("\n"))
}

fn validate(args: &SimulateArgs) -> Result<(), BreathError> {
    if let Some(volume) = args.volume {
        if !(0.0..=1.0).contains(&volume) {
            return Err(BreathError::InvalidArgument(format!(
                "--volume must be between 0.0 and 1.0, got {volume}"
            )));
        }
    }
    match (args.stop_at, args.restart_at) {
        (None, Some(_)) => {
            return Err(BreathError::InvalidArgument(
                "--restart-at requires --stop-at".to_string(),
            ));
        }
        (Some(stop), Some(restart)) if restart < stop => {
            return Err(BreathError::InvalidArgument(format!(
                "--restart-at ({restart}) must not come before --stop-at ({stop})"
            )));
        }
        _ => {}
    }
    for (flag, at) in [("--stop-at", args.stop_at), ("--restart-at", args.restart_at)] {
        if let Some(at) = at.filter(|&at| at > args.seconds) {
            return Err(BreathError::InvalidArgument(format!(
                "{flag} ({at}) is past the end of the run ({} seconds)",
                args.seconds
            )));
        }
    }
    Ok(())
}
