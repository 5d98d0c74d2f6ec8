//! Snapshots and the bus that carries them to observers.
//!
//! Every published [`SessionUpdate`] is taken after a callback has fully
//! applied, so observers never see half a tick.

use std::sync::Mutex;

use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::Serialize;

use super::epoch::Epochs;
use super::stage::{Phase, Stage};
use crate::audio::{AudioState, Fade};

/// Everything a renderer needs, frozen at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    /// Virtual time since the session was created, in milliseconds.
    pub elapsed_ms: u64,
    pub stage: Stage,
    pub phase: Phase,
    /// Seconds left in the phase (1..=4).
    pub phase_remaining: u8,
    /// Countdown digit (1..=3).
    pub countdown: u8,
    pub epochs: Epochs,
    /// Full Inhale..Hold cycles finished since the last start.
    pub completed_cycles: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioState>,
}

/// Why a snapshot was published.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    StageChanged { from: Stage, to: Stage },
    CountdownTick { value: u8 },
    PhaseTick { remaining: u8 },
    PhaseAdvanced { phase: Phase },
    AudioChanged { volume: f32, muted: bool, fade: Option<Fade> },
}

impl SessionEvent {
    /// Short name used in logs and pretty output.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::StageChanged { .. } => "stage",
            Self::CountdownTick { .. } => "countdown",
            Self::PhaseTick { .. } => "tick",
            Self::PhaseAdvanced { .. } => "phase",
            Self::AudioChanged { .. } => "audio",
        }
    }
}

/// An event together with the state right after it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionUpdate {
    #[serde(flatten)]
    pub event: SessionEvent,
    pub snapshot: SessionSnapshot,
}

/// Broadcasts [`SessionUpdate`]s to any number of subscribers.
pub struct EventBus {
    subscribers: Mutex<Vec<Sender<SessionUpdate>>>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.subscribers.lock().map_or(0, |subs| subs.len());
        f.debug_struct("EventBus").field("subscribers", &count).finish()
    }
}

impl EventBus {
    /// Create a new event bus with no subscribers
    #[must_use]
    pub const fn new() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Subscribe to updates. The receiver gets every update published after
    /// this call.
    pub fn subscribe(&self) -> Receiver<SessionUpdate> {
        let (tx, rx) = unbounded();
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(tx);
        }
        rx
    }

    /// Publish to all subscribers, dropping any that hung up.
    pub fn emit(&self, update: &SessionUpdate) {
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.retain(|tx| tx.send(update.clone()).is_ok());
        }
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().map_or(0, |subs| subs.len())
    }
}
