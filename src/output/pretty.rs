use std::path::Path;

use colored::{ColoredString, Colorize};

use crate::breath::{Phase, SessionEvent, SessionUpdate, Stage, PHASE_SECONDS};
use crate::config::Config;
use crate::core::{format_duration, render_progress_bar};
use crate::error::BreathError;
use crate::output::RunSummary;

/// Virtual time as `MM:SS.d`.
#[must_use]
pub fn format_elapsed(ms: u64) -> String {
    let seconds = ms / 1000;
    format!("{:02}:{:02}.{}", seconds / 60, seconds % 60, (ms % 1000) / 100)
}

fn stage_colored(stage: Stage) -> ColoredString {
    let name = stage.display_name();
    match stage {
        Stage::Idle => name.dimmed(),
        Stage::Preparing => name.yellow(),
        Stage::Countdown => name.magenta(),
        Stage::Running => name.green(),
    }
}

fn phase_colored(phase: Phase) -> ColoredString {
    match phase {
        Phase::Inhale => phase.label().cyan(),
        Phase::Exhale => phase.label().blue(),
        Phase::Hold1 | Phase::Hold2 => phase.label().white(),
    }
}

/// Format one published update as a single line.
#[must_use]
pub fn format_update_pretty(update: &SessionUpdate) -> String {
    let snap = &update.snapshot;
    let detail = match &update.event {
        SessionEvent::StageChanged { from, to } => {
            format!("{} → {}", stage_colored(*from), stage_colored(*to).bold())
        }
        SessionEvent::CountdownTick { value } => value.to_string().magenta().bold().to_string(),
        SessionEvent::PhaseTick { remaining } => {
            let done = f64::from(PHASE_SECONDS - remaining) / f64::from(PHASE_SECONDS);
            format!(
                "{} {}s {}",
                phase_colored(snap.phase),
                remaining,
                render_progress_bar(done, 8).dimmed()
            )
        }
        SessionEvent::PhaseAdvanced { phase } => {
            let mut line = phase_colored(*phase).bold().to_string();
            if *phase == Phase::Inhale && snap.completed_cycles > 0 {
                line.push_str(&format!(
                    "  {}",
                    format!("cycle {} done", snap.completed_cycles).dimmed()
                ));
            }
            line
        }
        SessionEvent::AudioChanged { volume, muted, fade } => {
            let mut line = format!("volume {volume:.2}");
            if *muted {
                line.push_str(&format!(" {}", "muted".red()));
            }
            if let Some(fade) = fade {
                line.push_str(&format!(" {}", format!("fade {fade:?}").to_lowercase().dimmed()));
            }
            line
        }
    };

    format!(
        "{}  {:<9}  {}",
        format_elapsed(snap.elapsed_ms).dimmed(),
        update.event.name(),
        detail
    )
}

/// Format the end-of-run summary.
#[must_use]
pub fn format_summary_pretty(summary: &RunSummary) -> String {
    let mut output = format!("{}\n", "Session summary".bold());
    output.push_str(&"─".repeat(40));
    output.push('\n');
    output.push_str(&format!(
        "  {}: {}\n",
        "Started".dimmed(),
        summary.started_at.format("%Y-%m-%d %H:%M")
    ));
    output.push_str(&format!(
        "  {}: {}\n",
        "Breathed".dimmed(),
        format_duration(chrono::Duration::seconds(
            i64::try_from(summary.breathed_seconds).unwrap_or(i64::MAX)
        ))
    ));
    output.push_str(&format!(
        "  {}: {}\n",
        "Cycles".dimmed(),
        summary.completed_cycles.to_string().green()
    ));
    output.push_str(&format!("  {}: {}", "Sessions".dimmed(), summary.sessions_started));
    output
}

/// Format the effective configuration.
///
/// # Errors
///
/// Returns an error if YAML serialization fails.
pub fn format_config_pretty(config: &Config, path: &Path) -> Result<String, BreathError> {
    let status = if path.exists() {
        "".normal()
    } else {
        " (not found, using defaults)".yellow()
    };
    let mut output = format!("{}: {}{}\n", "Config file".bold(), path.display(), status);
    output.push_str(&"─".repeat(40));
    output.push('\n');
    output.push_str(config.to_yaml()?.trim_end());
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breath::BreathSession;
    use std::time::Duration;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0), "00:00.0");
        assert_eq!(format_elapsed(6_100), "00:06.1");
        assert_eq!(format_elapsed(75_000), "01:15.0");
    }

    #[test]
    fn test_stage_change_line() {
        plain();
        let mut session = BreathSession::new();
        let rx = session.subscribe();
        session.start();

        let update = rx.try_recv().unwrap();
        let line = format_update_pretty(&update);
        assert!(line.starts_with("00:00.0"));
        assert!(line.contains("stage"));
        assert!(line.contains("Idle → Preparing"));
    }

    #[test]
    fn test_phase_tick_line() {
        plain();
        let mut session = BreathSession::new();
        session.start();
        session.advance(Duration::from_secs(6));
        let rx = session.subscribe();
        session.advance(Duration::from_secs(1));

        let line = format_update_pretty(&rx.try_recv().unwrap());
        assert!(line.contains("tick"));
        assert!(line.contains("Inhale 3s"));
    }

    #[test]
    fn test_summary() {
        plain();
        let summary = RunSummary {
            started_at: chrono::Local::now(),
            breathed_seconds: 96,
            completed_cycles: 6,
            sessions_started: 1,
        };
        let text = format_summary_pretty(&summary);
        assert!(text.contains("1 minute"));
        assert!(text.contains("Cycles: 6"));
    }
}
