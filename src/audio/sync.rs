//! Audio synchronizer.
//!
//! Keeps background audio in step with the session stage:
//! - entering Countdown (after a user gesture) rewinds, starts playback at
//!   zero volume and fades up to the target
//! - entering Idle fades down to zero, then pauses and rewinds
//!
//! Fades move 0.1 every 100ms and never pass their goal. Only one fade timer
//! exists at a time; starting a fade cancels the previous one first.
//!
//! Backend failures are logged here and go no further.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::playable::Playable;
use super::{FADE_INTERVAL, FADE_STEP};
use crate::breath::Stage;
use crate::core::{Scheduler, TimerId};

/// Direction of a volume ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fade {
    In,
    Out,
}

/// Observable audio state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioState {
    pub current_volume: f32,
    pub target_volume: f32,
    pub muted: bool,
    pub has_user_gesture: bool,
}

/// Result of one fade step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeStep {
    pub fade: Fade,
    pub volume: f32,
    /// The ramp reached its goal and its timer was cancelled.
    pub finished: bool,
}

/// Float drift below this counts as having arrived.
const SNAP: f32 = 1e-4;

/// Move `current` one `step` toward `goal` without passing it.
#[must_use]
pub fn step_toward(current: f32, goal: f32, step: f32) -> f32 {
    if current < goal {
        (current + step).min(goal)
    } else {
        (current - step).max(goal)
    }
}

/// Fades a [`Playable`] in and out on stage boundaries.
pub struct AudioSync {
    track: Box<dyn Playable>,
    state: AudioState,
    stage: Stage,
    available: bool,
    timers: Scheduler<Fade>,
    fade: Option<(TimerId, Fade)>,
}

impl std::fmt::Debug for AudioSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioSync")
            .field("state", &self.state)
            .field("stage", &self.stage)
            .field("available", &self.available)
            .field("fade", &self.fade.map(|(_, fade)| fade))
            .finish_non_exhaustive()
    }
}

impl AudioSync {
    /// Take ownership of `track`. Nothing plays until a user gesture.
    #[must_use]
    pub fn new(mut track: Box<dyn Playable>, target_volume: f32, muted: bool) -> Self {
        track.set_volume(0.0);
        track.set_muted(muted);
        Self {
            track,
            state: AudioState {
                current_volume: 0.0,
                target_volume: target_volume.clamp(0.0, 1.0),
                muted,
                has_user_gesture: false,
            },
            stage: Stage::Idle,
            available: true,
            timers: Scheduler::new(),
            fade: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> AudioState {
        self.state
    }

    /// Direction of the running fade, if any.
    #[must_use]
    pub fn fade(&self) -> Option<Fade> {
        self.fade.map(|(_, fade)| fade)
    }

    /// Number of scheduled fade timers (0 or 1).
    #[must_use]
    pub fn pending_fades(&self) -> usize {
        self.timers.len()
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.track.is_playing()
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    #[must_use]
    pub const fn now(&self) -> Duration {
        self.timers.now()
    }

    /// Record the first user interaction and prime the track.
    ///
    /// Returns true the first time only.
    pub fn on_user_gesture(&mut self) -> bool {
        if self.state.has_user_gesture {
            return false;
        }
        self.state.has_user_gesture = true;

        if let Err(e) = self.track.load() {
            warn!(error = %e, "audio unavailable, continuing silently");
            self.available = false;
            return true;
        }

        // One play attempt from inside the gesture, then straight back to
        // paused at zero volume.
        self.track.set_volume(0.0);
        match self.track.play() {
            Ok(()) => self.track.pause(),
            Err(e) => warn!(error = %e, "priming playback rejected"),
        }
        debug!("audio primed");
        true
    }

    /// React to a stage change. Only Countdown and Idle matter.
    pub fn on_stage_change(&mut self, stage: Stage) {
        self.stage = stage;
        match stage {
            Stage::Countdown if self.state.has_user_gesture => self.begin_fade_in(),
            Stage::Countdown => debug!("no user gesture yet, audio stays off"),
            Stage::Idle => self.begin_fade_out(),
            Stage::Preparing | Stage::Running => {}
        }
    }

    /// Set the target volume. While running it also applies at once.
    pub fn set_volume(&mut self, volume: f32) {
        let volume = volume.clamp(0.0, 1.0);
        self.state.target_volume = volume;

        match self.stage {
            Stage::Running => {
                if self.fade() == Some(Fade::In) {
                    self.cancel_fade();
                }
                self.state.current_volume = volume;
                self.track.set_volume(volume);
            }
            // The countdown ramp already finished; ramp on to the new target
            // without restarting the track.
            Stage::Countdown
                if self.state.has_user_gesture
                    && self.fade.is_none()
                    && (self.state.current_volume - volume).abs() >= SNAP =>
            {
                self.arm_fade_in();
            }
            Stage::Idle | Stage::Preparing | Stage::Countdown => {}
        }
        debug!(volume, stage = %self.stage, "target volume set");
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.state.muted = muted;
        self.track.set_muted(muted);
    }

    /// Flip the mute flag and return the new value.
    pub fn toggle_mute(&mut self) -> bool {
        let muted = !self.state.muted;
        self.set_muted(muted);
        muted
    }

    /// Move the clock forward to `t` without firing anything.
    pub fn advance_clock(&mut self, t: Duration) {
        self.timers.advance_to(t);
    }

    /// Fire the earliest fade step due at or before `until`, if any.
    pub fn fire_next(&mut self, until: Duration) -> Option<FadeStep> {
        let (_, fade) = self.timers.pop_due(until)?;
        Some(match fade {
            Fade::In => self.fade_in_step(),
            Fade::Out => self.fade_out_step(),
        })
    }

    fn begin_fade_in(&mut self) {
        self.cancel_fade();

        self.rewind();
        self.state.current_volume = 0.0;
        self.track.set_volume(0.0);
        self.start_playback();
        self.arm_fade_in();
    }

    fn arm_fade_in(&mut self) {
        let id = self.timers.every(FADE_INTERVAL, Fade::In);
        self.fade = Some((id, Fade::In));
        info!(goal = self.state.target_volume, "fading in");
    }

    fn begin_fade_out(&mut self) {
        self.cancel_fade();

        if self.state.current_volume <= 0.0 {
            self.finish_fade_out();
            return;
        }

        let id = self.timers.every(FADE_INTERVAL, Fade::Out);
        self.fade = Some((id, Fade::Out));
        info!(from = self.state.current_volume, "fading out");
    }

    fn fade_in_step(&mut self) -> FadeStep {
        let target = self.state.target_volume;
        self.state.current_volume = step_toward(self.state.current_volume, target, FADE_STEP);
        self.track.set_volume(self.state.current_volume);

        let finished = (self.state.current_volume - target).abs() < SNAP;
        if finished {
            self.state.current_volume = target;
            self.cancel_fade();
            debug!(volume = target, "fade in complete");
        }
        FadeStep {
            fade: Fade::In,
            volume: self.state.current_volume,
            finished,
        }
    }

    fn fade_out_step(&mut self) -> FadeStep {
        self.state.current_volume = step_toward(self.state.current_volume, 0.0, FADE_STEP);
        self.track.set_volume(self.state.current_volume);

        let finished = self.state.current_volume < SNAP;
        if finished {
            self.cancel_fade();
            self.finish_fade_out();
            debug!("fade out complete");
        }
        FadeStep {
            fade: Fade::Out,
            volume: self.state.current_volume,
            finished,
        }
    }

    fn finish_fade_out(&mut self) {
        self.state.current_volume = 0.0;
        self.track.set_volume(0.0);
        self.track.pause();
        self.rewind();
    }

    fn cancel_fade(&mut self) {
        if let Some((id, fade)) = self.fade.take() {
            self.timers.cancel(id);
            debug!(?fade, "fade cancelled");
        }
    }

    fn start_playback(&mut self) {
        if !self.available {
            debug!("audio unavailable, skipping playback");
            return;
        }
        if let Err(error) = self.track.play() {
            warn!(%error, "playback rejected");
        }
    }

    fn rewind(&mut self) {
        if !self.available {
            return;
        }
        if let Err(error) = self.track.set_position(Duration::ZERO) {
            warn!(%error, "rewind failed");
        }
    }
}
