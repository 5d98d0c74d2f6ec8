//! A breathing session: controller, optional audio and observers.
//!
//! The session owns the one virtual clock. [`BreathSession::advance`] fires
//! every due callback in deadline order (controller before audio on ties),
//! forwards stage changes to the audio synchronizer and publishes a snapshot
//! after each one.

use std::time::Duration;

use crossbeam_channel::Receiver;
use tracing::{debug, trace};

use super::controller::{ControllerEvent, SessionController, Transition};
use super::events::{EventBus, SessionEvent, SessionSnapshot, SessionUpdate};
use super::phase::PhaseStep;
use super::stage::{Phase, Stage};
use crate::audio::{AudioSync, FadeStep, FADE_STEP};

/// Totals across every start/stop within this process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Number of times a session was started.
    pub sessions_started: u64,
    /// Seconds spent in the Running stage.
    pub running_seconds: u64,
    /// Full cycles finished, all sessions together.
    pub completed_cycles: u64,
}

/// Which component owns the next due callback.
enum Due {
    Controller,
    Audio,
}

/// The whole breathing timer.
#[derive(Debug)]
pub struct BreathSession {
    controller: SessionController,
    audio: Option<AudioSync>,
    bus: EventBus,
    cycles_this_session: u64,
    stats: SessionStats,
}

impl Default for BreathSession {
    fn default() -> Self {
        Self::new()
    }
}

impl BreathSession {
    /// A silent session.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            controller: SessionController::new(),
            audio: None,
            bus: EventBus::new(),
            cycles_this_session: 0,
            stats: SessionStats {
                sessions_started: 0,
                running_seconds: 0,
                completed_cycles: 0,
            },
        }
    }

    /// A session with background audio.
    #[must_use]
    pub fn with_audio(audio: AudioSync) -> Self {
        Self {
            audio: Some(audio),
            ..Self::new()
        }
    }

    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.controller.stage()
    }

    #[must_use]
    pub const fn controller(&self) -> &SessionController {
        &self.controller
    }

    #[must_use]
    pub const fn audio(&self) -> Option<&AudioSync> {
        self.audio.as_ref()
    }

    #[must_use]
    pub const fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Current virtual time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.controller.now()
    }

    /// Receive every update published from now on.
    pub fn subscribe(&self) -> Receiver<SessionUpdate> {
        self.bus.subscribe()
    }

    /// Current state.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            elapsed_ms: u64::try_from(self.now().as_millis()).unwrap_or(u64::MAX),
            stage: self.controller.stage(),
            phase: self.controller.phase(),
            phase_remaining: self.controller.phase_remaining(),
            countdown: self.controller.countdown(),
            epochs: self.controller.epochs(),
            completed_cycles: self.cycles_this_session,
            audio: self.audio.as_ref().map(AudioSync::state),
        }
    }

    /// Start when idle, stop otherwise.
    pub fn toggle(&mut self) -> Option<Transition> {
        let transition = self.controller.toggle()?;
        self.apply_transition(transition);
        Some(transition)
    }

    pub fn start(&mut self) -> Option<Transition> {
        let transition = self.controller.start()?;
        self.apply_transition(transition);
        Some(transition)
    }

    pub fn stop(&mut self) -> Option<Transition> {
        let transition = self.controller.stop()?;
        self.apply_transition(transition);
        Some(transition)
    }

    /// Record a direct user interaction, which unlocks audio playback.
    pub fn user_gesture(&mut self) {
        if let Some(audio) = &mut self.audio {
            if audio.on_user_gesture() {
                debug!("first user gesture");
            }
        }
    }

    /// Set the audio target volume. No-op without audio.
    pub fn set_volume(&mut self, volume: f32) {
        if let Some(audio) = &mut self.audio {
            audio.set_volume(volume);
            self.publish_audio();
        }
    }

    /// Nudge the target volume by `steps` fade steps.
    pub fn adjust_volume(&mut self, steps: i8) {
        if let Some(audio) = &self.audio {
            let grid = FADE_STEP.recip();
            let scaled = audio.state().target_volume * grid;
            // An off-grid target lands on the next grid line in the nudge
            // direction, so one press never moves more than one step.
            let base = if (scaled - scaled.round()).abs() < 1e-3 {
                scaled.round()
            } else if steps > 0 {
                scaled.floor()
            } else {
                scaled.ceil()
            };
            self.set_volume((base + f32::from(steps)) / grid);
        }
    }

    /// Flip mute. Returns the new flag, or None without audio.
    pub fn toggle_mute(&mut self) -> Option<bool> {
        let muted = self.audio.as_mut()?.toggle_mute();
        self.publish_audio();
        Some(muted)
    }

    /// Advance the virtual clock by `dt`. Returns how many callbacks fired.
    pub fn advance(&mut self, dt: Duration) -> usize {
        let until = self.now() + dt;
        self.advance_to(until)
    }

    /// Advance the virtual clock to `until`. Returns how many callbacks fired.
    pub fn advance_to(&mut self, until: Duration) -> usize {
        let mut fired = 0;

        while let Some((deadline, due)) = self.next_due(until) {
            self.sync_clocks(deadline);
            match due {
                Due::Controller => {
                    if let Some(event) = self.controller.fire_next(deadline) {
                        self.on_controller_event(event);
                    }
                }
                Due::Audio => {
                    if let Some(step) = self.audio.as_mut().and_then(|a| a.fire_next(deadline)) {
                        self.on_fade_step(step);
                    }
                }
            }
            fired += 1;
        }

        self.sync_clocks(until);
        fired
    }

    fn next_due(&self, until: Duration) -> Option<(Duration, Due)> {
        let controller = self.controller.next_deadline();
        let audio = self.audio.as_ref().and_then(AudioSync::next_deadline);

        let (deadline, due) = match (controller, audio) {
            (Some(c), Some(a)) if a < c => (a, Due::Audio),
            (Some(c), _) => (c, Due::Controller),
            (None, Some(a)) => (a, Due::Audio),
            (None, None) => return None,
        };
        (deadline <= until).then_some((deadline, due))
    }

    fn sync_clocks(&mut self, t: Duration) {
        self.controller.advance_clock(t);
        if let Some(audio) = &mut self.audio {
            audio.advance_clock(t);
        }
    }

    fn on_controller_event(&mut self, event: ControllerEvent) {
        match event {
            ControllerEvent::StageChanged(transition) => self.apply_transition(transition),
            ControllerEvent::CountdownTick { value } => {
                self.publish(SessionEvent::CountdownTick { value });
            }
            ControllerEvent::Phase(step) => {
                self.stats.running_seconds += 1;
                match step {
                    PhaseStep::Counted { remaining } => {
                        self.publish(SessionEvent::PhaseTick { remaining });
                    }
                    PhaseStep::Advanced { phase } => {
                        if phase == Phase::Inhale {
                            self.cycles_this_session += 1;
                            self.stats.completed_cycles += 1;
                        }
                        self.publish(SessionEvent::PhaseAdvanced { phase });
                    }
                }
            }
        }
    }

    fn on_fade_step(&mut self, step: FadeStep) {
        trace!(?step.fade, volume = step.volume, "fade step");
        self.publish_audio();
    }

    fn apply_transition(&mut self, transition: Transition) {
        if transition.to == Stage::Preparing {
            self.cycles_this_session = 0;
            self.stats.sessions_started += 1;
        }
        if let Some(audio) = &mut self.audio {
            audio.on_stage_change(transition.to);
        }
        self.publish(SessionEvent::StageChanged {
            from: transition.from,
            to: transition.to,
        });
    }

    fn publish_audio(&mut self) {
        if let Some(audio) = &self.audio {
            let state = audio.state();
            let fade = audio.fade();
            self.publish(SessionEvent::AudioChanged {
                volume: state.current_volume,
                muted: state.muted,
                fade,
            });
        }
    }

    fn publish(&self, event: SessionEvent) {
        let update = SessionUpdate {
            event,
            snapshot: self.snapshot(),
        };
        self.bus.emit(&update);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SilentTrack;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    fn drain(rx: &Receiver<SessionUpdate>) -> Vec<SessionUpdate> {
        rx.try_iter().collect()
    }

    fn stage_changes(updates: &[SessionUpdate]) -> Vec<(Stage, Stage)> {
        updates
            .iter()
            .filter_map(|u| match u.event {
                SessionEvent::StageChanged { from, to } => Some((from, to)),
                _ => None,
            })
            .collect()
    }

    fn audio_session(volume: f32) -> BreathSession {
        let sync = AudioSync::new(Box::new(SilentTrack::new()), volume, false);
        BreathSession::with_audio(sync)
    }

    #[test]
    fn test_full_lifecycle_publishes_stage_changes() {
        let mut session = BreathSession::new();
        let rx = session.subscribe();

        session.toggle();
        session.advance(secs(10));
        session.toggle();

        let updates = drain(&rx);
        assert_eq!(
            stage_changes(&updates),
            vec![
                (Stage::Idle, Stage::Preparing),
                (Stage::Preparing, Stage::Countdown),
                (Stage::Countdown, Stage::Running),
                (Stage::Running, Stage::Idle),
            ]
        );
        assert_eq!(session.stage(), Stage::Idle);
    }

    #[test]
    fn test_snapshot_after_countdown() {
        let mut session = BreathSession::new();
        session.start();
        session.advance(secs(3));

        let snap = session.snapshot();
        assert_eq!(snap.stage, Stage::Countdown);
        assert_eq!(snap.countdown, 3);
        assert_eq!(snap.elapsed_ms, 3000);

        session.advance(secs(3));
        let snap = session.snapshot();
        assert_eq!(snap.stage, Stage::Running);
        assert_eq!(snap.phase, Phase::Inhale);
        assert_eq!(snap.phase_remaining, 4);
    }

    #[test]
    fn test_published_snapshots_are_complete() {
        let mut session = BreathSession::new();
        let rx = session.subscribe();
        session.start();
        session.advance(secs(10));

        for update in drain(&rx) {
            if let SessionEvent::PhaseAdvanced { phase } = update.event {
                assert_eq!(update.snapshot.phase, phase);
                assert_eq!(update.snapshot.phase_remaining, 4);
            }
            if let SessionEvent::PhaseTick { remaining } = update.event {
                assert_eq!(update.snapshot.phase_remaining, remaining);
            }
        }
    }

    #[test]
    fn test_cycles_and_stats() {
        let mut session = BreathSession::new();
        session.start();
        // 6s to reach Running, then 32 ticks = 2 cycles.
        session.advance(secs(38));
        assert_eq!(session.snapshot().completed_cycles, 2);

        session.stop();
        session.start();
        assert_eq!(session.snapshot().completed_cycles, 0);

        let stats = session.stats();
        assert_eq!(stats.sessions_started, 2);
        assert_eq!(stats.running_seconds, 32);
        assert_eq!(stats.completed_cycles, 2);
    }

    #[test]
    fn test_stop_leaves_nothing_scheduled() {
        let mut session = BreathSession::new();
        session.start();
        session.advance(secs(4));
        session.stop();

        assert_eq!(session.advance(secs(60)), 0);
        assert_eq!(session.stage(), Stage::Idle);
    }

    #[test]
    fn test_audio_follows_stage() {
        let mut session = audio_session(0.8);
        session.user_gesture();
        session.start();
        session.advance(secs(3));

        let audio = session.audio().unwrap();
        assert_eq!(audio.fade(), Some(crate::audio::Fade::In));
        assert!(audio.is_playing());

        session.advance(Duration::from_millis(800));
        let state = session.audio().unwrap().state();
        assert!((state.current_volume - 0.8).abs() < 1e-4);

        session.advance(secs(5));
        session.stop();
        session.advance(secs(1));
        let audio = session.audio().unwrap();
        assert!(audio.state().current_volume.abs() < f32::EPSILON);
        assert!(!audio.is_playing());
    }

    #[test]
    fn test_audio_without_gesture_stays_silent() {
        let mut session = audio_session(0.8);
        session.start();
        session.advance(secs(8));

        let audio = session.audio().unwrap();
        assert!(!audio.is_playing());
        assert!(audio.state().current_volume.abs() < f32::EPSILON);
        assert_eq!(session.stage(), Stage::Running);
    }

    #[test]
    fn test_rapid_stop_start_has_single_ramp() {
        let mut session = audio_session(1.0);
        session.user_gesture();
        session.start();
        session.advance(secs(7));

        session.stop();
        session.advance(Duration::from_millis(300));
        assert_eq!(session.audio().unwrap().fade(), Some(crate::audio::Fade::Out));

        session.start();
        assert_eq!(session.audio().unwrap().fade(), Some(crate::audio::Fade::Out));
        session.advance(secs(3));
        let audio = session.audio().unwrap();
        assert_eq!(audio.fade(), Some(crate::audio::Fade::In));
        assert_eq!(audio.pending_fades(), 1);
    }

    #[test]
    fn test_adjust_volume_snaps_to_tenths() {
        let mut session = audio_session(0.5);
        for _ in 0..3 {
            session.adjust_volume(1);
        }
        let target = session.audio().unwrap().state().target_volume;
        assert!((target - 0.8).abs() < f32::EPSILON);

        for _ in 0..20 {
            session.adjust_volume(-1);
        }
        assert!(session.audio().unwrap().state().target_volume.abs() < f32::EPSILON);
    }

    #[test]
    fn test_adjust_volume_from_off_grid_target_moves_one_step() {
        let mut session = audio_session(0.55);
        session.adjust_volume(1);
        let target = session.audio().unwrap().state().target_volume;
        assert!((target - 0.6).abs() < 1e-6);

        session.set_volume(0.55);
        session.adjust_volume(-1);
        let target = session.audio().unwrap().state().target_volume;
        assert!((target - 0.5).abs() < 1e-6);

        // Back and forth from a grid line returns to it.
        session.adjust_volume(1);
        session.adjust_volume(-1);
        let target = session.audio().unwrap().state().target_volume;
        assert!((target - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_volume_intents_without_audio_are_noops() {
        let mut session = BreathSession::new();
        session.set_volume(0.3);
        session.adjust_volume(1);
        assert!(session.toggle_mute().is_none());
        assert!(session.snapshot().audio.is_none());
    }
}
