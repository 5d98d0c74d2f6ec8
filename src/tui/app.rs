//! Application state for the TUI.

use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;

use crate::breath::{
    BreathSession, Epochs, Phase, SessionEvent, SessionSnapshot, SessionStats, SessionUpdate,
    Stage, PHASE_SECONDS,
};
use crate::tui::animation::{
    fade_out, indicator_position, progress, pulse, DIGIT_PULSE, PREPARATION_FADE,
};

/// What the middle of the square shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CenterText {
    /// `Press` / `Start`.
    Prompt,
    Preparation { opacity: f64 },
    Countdown { digit: u8, opacity: f64 },
    /// Seconds left in the phase.
    Seconds(u8),
}

/// Virtual times at which each animation last restarted.
#[derive(Debug, Clone, Copy, Default)]
struct Marks {
    indicator: Duration,
    preparation: Duration,
    countdown: Duration,
}

/// Application state.
pub struct App {
    session: BreathSession,
    updates: Receiver<SessionUpdate>,
    started: Instant,
    /// Latest published state.
    pub snapshot: SessionSnapshot,
    marks: Marks,
    /// Status message to display.
    pub status: Option<String>,
    /// Whether the key help is open.
    pub show_help: bool,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl App {
    /// Create a new app around `session`, with its clock starting now.
    #[must_use]
    pub fn new(session: BreathSession) -> Self {
        let updates = session.subscribe();
        let snapshot = session.snapshot();
        Self {
            session,
            updates,
            started: Instant::now(),
            snapshot,
            marks: Marks::default(),
            status: Some("Press any key, then space to start".to_string()),
            show_help: false,
            should_quit: false,
        }
    }

    /// Bring the session clock up to the wall clock.
    pub fn tick(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.started);
        self.tick_to(elapsed);
    }

    /// Advance the session clock to `elapsed` and absorb what it published.
    pub fn tick_to(&mut self, elapsed: Duration) {
        self.session.advance_to(elapsed);
        self.drain();
    }

    fn drain(&mut self) {
        while let Ok(update) = self.updates.try_recv() {
            self.absorb(&update);
        }
        self.snapshot = self.session.snapshot();
    }

    fn absorb(&mut self, update: &SessionUpdate) {
        let at = Duration::from_millis(update.snapshot.elapsed_ms);
        let before: Epochs = self.snapshot.epochs;
        let after = update.snapshot.epochs;

        if after.indicator != before.indicator {
            self.marks.indicator = at;
        }
        if after.preparation != before.preparation {
            self.marks.preparation = at;
        }
        if after.countdown != before.countdown {
            self.marks.countdown = at;
        }
        if let SessionEvent::StageChanged { to, .. } = update.event {
            match to {
                Stage::Countdown => self.marks.countdown = at,
                Stage::Running => self.marks.indicator = at,
                Stage::Idle | Stage::Preparing => {}
            }
        }
        self.snapshot = update.snapshot.clone();
    }

    fn since(&self, mark: Duration) -> Duration {
        self.session.now().saturating_sub(mark)
    }

    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.snapshot.stage
    }

    /// Text for the middle of the square.
    #[must_use]
    pub fn center_text(&self) -> CenterText {
        match self.snapshot.stage {
            Stage::Idle => CenterText::Prompt,
            Stage::Preparing => CenterText::Preparation {
                opacity: fade_out(self.since(self.marks.preparation), PREPARATION_FADE),
            },
            Stage::Countdown => CenterText::Countdown {
                digit: self.snapshot.countdown,
                opacity: pulse(self.since(self.marks.countdown), DIGIT_PULSE),
            },
            Stage::Running => CenterText::Seconds(self.snapshot.phase_remaining),
        }
    }

    /// Phase and dot position. The dot rests at the top-left corner unless
    /// running.
    #[must_use]
    pub fn indicator(&self) -> (Phase, (f64, f64)) {
        if self.snapshot.stage != Stage::Running {
            return (Phase::Inhale, (0.0, 0.0));
        }
        let phase = self.snapshot.phase;
        let along = progress(
            self.since(self.marks.indicator),
            Duration::from_secs(u64::from(PHASE_SECONDS)),
        );
        (phase, indicator_position(phase, along))
    }

    /// Short audio description for the header, if audio is attached.
    #[must_use]
    pub fn audio_label(&self) -> Option<String> {
        let audio = self.snapshot.audio?;
        if audio.muted {
            return Some("muted".to_string());
        }
        Some(format!("vol {:.1}", audio.target_volume))
    }

    /// Virtual time since the app started.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.session.now()
    }

    /// Any key press counts as a user gesture.
    pub fn on_key(&mut self) {
        self.session.user_gesture();
    }

    /// Start or stop.
    pub fn toggle(&mut self) {
        if let Some(transition) = self.session.toggle() {
            self.status = Some(match transition.to {
                Stage::Idle => "Stopped".to_string(),
                _ => "Starting".to_string(),
            });
        }
        self.drain();
    }

    /// Nudge the volume by one step.
    pub fn adjust_volume(&mut self, steps: i8) {
        self.session.adjust_volume(steps);
        self.drain();
        self.status = Some(
            self.snapshot
                .audio
                .map_or_else(|| "No audio".to_string(), |a| format!("Volume {:.1}", a.target_volume)),
        );
    }

    pub fn toggle_mute(&mut self) {
        self.status = Some(match self.session.toggle_mute() {
            Some(true) => "Muted".to_string(),
            Some(false) => "Unmuted".to_string(),
            None => "No audio".to_string(),
        });
        self.drain();
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Hand back the totals once the screen closes.
    #[must_use]
    pub const fn stats(&self) -> SessionStats {
        self.session.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioSync, SilentTrack};

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_idle_prompt() {
        let app = App::new(BreathSession::new());
        assert_eq!(app.center_text(), CenterText::Prompt);
        assert_eq!(app.indicator(), (Phase::Inhale, (0.0, 0.0)));
    }

    #[test]
    fn test_preparation_fades_out() {
        let mut app = App::new(BreathSession::new());
        app.toggle();
        app.tick_to(ms(1500));

        match app.center_text() {
            CenterText::Preparation { opacity } => assert!((opacity - 0.5).abs() < 1e-9),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_countdown_digit_pulses() {
        let mut app = App::new(BreathSession::new());
        app.toggle();
        app.tick_to(ms(3500));
        match app.center_text() {
            CenterText::Countdown { digit, opacity } => {
                assert_eq!(digit, 3);
                assert!((opacity - 1.0).abs() < 1e-9);
            }
            other => panic!("unexpected {other:?}"),
        }

        // The second digit restarts its own pulse.
        app.tick_to(ms(4000));
        match app.center_text() {
            CenterText::Countdown { digit, opacity } => {
                assert_eq!(digit, 2);
                assert!(opacity.abs() < 1e-9);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_dot_travels_during_running() {
        let mut app = App::new(BreathSession::new());
        app.toggle();
        app.tick_to(secs(8));

        assert_eq!(app.center_text(), CenterText::Seconds(2));
        let (phase, (x, y)) = app.indicator();
        assert_eq!(phase, Phase::Inhale);
        assert!((x - 0.5).abs() < 1e-9);
        assert!(y.abs() < 1e-9);

        // Halfway down the right side.
        app.tick_to(secs(12));
        let (phase, (x, y)) = app.indicator();
        assert_eq!(phase, Phase::Hold1);
        assert!((x - 1.0).abs() < 1e-9);
        assert!((y - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_restart_replays_preparation() {
        let mut app = App::new(BreathSession::new());
        app.toggle();
        app.tick_to(secs(2));
        app.toggle();
        app.tick_to(secs(5));
        app.toggle();

        match app.center_text() {
            CenterText::Preparation { opacity } => assert!((opacity - 1.0).abs() < 1e-9),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_volume_and_mute_status() {
        let sync = AudioSync::new(Box::new(SilentTrack::new()), 0.5, false);
        let mut app = App::new(BreathSession::with_audio(sync));
        app.on_key();

        app.adjust_volume(1);
        assert_eq!(app.status.as_deref(), Some("Volume 0.6"));
        assert_eq!(app.audio_label().as_deref(), Some("vol 0.6"));

        app.toggle_mute();
        assert_eq!(app.status.as_deref(), Some("Muted"));
        assert_eq!(app.audio_label().as_deref(), Some("muted"));
    }

    #[test]
    fn test_no_audio_status() {
        let mut app = App::new(BreathSession::new());
        app.toggle_mute();
        assert_eq!(app.status.as_deref(), Some("No audio"));
        assert!(app.audio_label().is_none());
    }

    #[test]
    fn test_stats_after_a_cycle() {
        let mut app = App::new(BreathSession::new());
        app.toggle();
        app.tick_to(secs(22));
        app.toggle();

        let stats = app.stats();
        assert_eq!(stats.completed_cycles, 1);
        assert_eq!(stats.running_seconds, 16);
        assert_eq!(stats.sessions_started, 1);
    }
}
