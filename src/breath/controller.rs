//! Session stage controller.
//!
//! Owns the [`Stage`] and the timers that move it forward on their own:
//! the preparation delay, the countdown tick and the running tick. Exactly one
//! of those is scheduled at a time, and every transition cancels it before
//! scheduling the next, so a stale timer never fires into a new stage.

use std::time::Duration;

use tracing::{debug, info};

use super::epoch::{Epoch, Epochs};
use super::phase::{PhaseDriver, PhaseStep};
use super::stage::{Phase, Stage};
use super::{COUNTDOWN_START, PREPARATION_DELAY, TICK};
use crate::core::{Scheduler, TimerId};

/// Work the controller schedules for itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StageTask {
    PreparationElapsed,
    CountdownTick,
    PhaseTick,
}

/// A stage change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Stage,
    pub to: Stage,
}

/// What happened when a scheduled task fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerEvent {
    /// The stage changed.
    StageChanged(Transition),
    /// The countdown moved to `value`.
    CountdownTick { value: u8 },
    /// The phase driver ticked.
    Phase(PhaseStep),
}

/// Drives idle → preparing → countdown → running.
#[derive(Debug, Clone)]
pub struct SessionController {
    stage: Stage,
    countdown: u8,
    driver: PhaseDriver,
    preparation_epoch: Epoch,
    countdown_epoch: Epoch,
    timers: Scheduler<StageTask>,
    pending: Option<TimerId>,
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionController {
    /// Create an idle controller at time zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stage: Stage::Idle,
            countdown: COUNTDOWN_START,
            driver: PhaseDriver::new(),
            preparation_epoch: Epoch::new(),
            countdown_epoch: Epoch::new(),
            timers: Scheduler::new(),
            pending: None,
        }
    }

    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    #[must_use]
    pub const fn countdown(&self) -> u8 {
        self.countdown
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.driver.phase()
    }

    #[must_use]
    pub const fn phase_remaining(&self) -> u8 {
        self.driver.remaining()
    }

    #[must_use]
    pub const fn epochs(&self) -> Epochs {
        Epochs {
            indicator: self.driver.epoch(),
            preparation: self.preparation_epoch,
            countdown: self.countdown_epoch,
        }
    }

    /// Current virtual time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.timers.now()
    }

    /// When the next scheduled task is due.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Whether any timer is scheduled.
    #[must_use]
    pub fn has_pending_work(&self) -> bool {
        !self.timers.is_empty()
    }

    /// Begin a session. Ignored unless idle.
    pub fn start(&mut self) -> Option<Transition> {
        if self.stage != Stage::Idle {
            debug!(stage = %self.stage, "start ignored");
            return None;
        }

        self.driver.reset();
        self.preparation_epoch.bump();
        let transition = self.enter(Stage::Preparing);
        self.pending = Some(self.timers.once(PREPARATION_DELAY, StageTask::PreparationElapsed));
        Some(transition)
    }

    /// End the session from any active stage. Ignored when idle.
    pub fn stop(&mut self) -> Option<Transition> {
        if self.stage == Stage::Idle {
            debug!("stop ignored, already idle");
            return None;
        }

        self.cancel_pending();
        self.countdown = COUNTDOWN_START;
        Some(self.enter(Stage::Idle))
    }

    /// Start when idle, stop otherwise.
    pub fn toggle(&mut self) -> Option<Transition> {
        if self.stage == Stage::Idle {
            self.start()
        } else {
            self.stop()
        }
    }

    /// Move the clock forward to `t` without firing anything.
    pub fn advance_clock(&mut self, t: Duration) {
        self.timers.advance_to(t);
    }

    /// Fire the earliest task due at or before `until`, if any.
    pub fn fire_next(&mut self, until: Duration) -> Option<ControllerEvent> {
        let (_, task) = self.timers.pop_due(until)?;
        let event = match task {
            StageTask::PreparationElapsed => self.on_preparation_elapsed(),
            StageTask::CountdownTick => self.on_countdown_tick(),
            StageTask::PhaseTick => ControllerEvent::Phase(self.driver.tick()),
        };
        Some(event)
    }

    fn on_preparation_elapsed(&mut self) -> ControllerEvent {
        self.pending = None;
        self.countdown = COUNTDOWN_START;
        let transition = self.enter(Stage::Countdown);
        self.pending = Some(self.timers.every(TICK, StageTask::CountdownTick));
        ControllerEvent::StageChanged(transition)
    }

    fn on_countdown_tick(&mut self) -> ControllerEvent {
        self.countdown_epoch.bump();

        if self.countdown > 1 {
            self.countdown -= 1;
            return ControllerEvent::CountdownTick {
                value: self.countdown,
            };
        }

        self.cancel_pending();
        self.countdown = COUNTDOWN_START;
        let transition = self.enter(Stage::Running);
        self.pending = Some(self.timers.every(TICK, StageTask::PhaseTick));
        ControllerEvent::StageChanged(transition)
    }

    fn cancel_pending(&mut self) {
        if let Some(id) = self.pending.take() {
            self.timers.cancel(id);
        }
        debug_assert!(self.timers.is_empty());
    }

    fn enter(&mut self, next: Stage) -> Transition {
        debug_assert!(
            self.stage.can_transition_to(next),
            "illegal transition {} -> {}",
            self.stage,
            next
        );
        let transition = Transition {
            from: self.stage,
            to: next,
        };
        self.stage = next;
        info!(from = %transition.from, to = %transition.to, at = ?self.now(), "stage changed");
        transition
    }
}
