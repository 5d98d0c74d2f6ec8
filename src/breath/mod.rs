//! The box-breathing state machine.
//!
//! - `controller`: idle → preparing → countdown → running, and back to idle
//! - `phase`: Inhale → Hold → Exhale → Hold, four seconds each
//! - `session`: ties the controller to audio and observers
//!
//! All timings are fixed.

mod controller;
mod epoch;
mod events;
mod phase;
mod session;
mod stage;

use std::time::Duration;

pub use controller::{ControllerEvent, SessionController, Transition};
pub use epoch::{Epoch, Epochs};
pub use events::{EventBus, SessionEvent, SessionSnapshot, SessionUpdate};
pub use phase::{PhaseDriver, PhaseStep};
pub use session::{BreathSession, SessionStats};
pub use stage::{Phase, Side, Stage};

/// Seconds in each breath phase.
pub const PHASE_SECONDS: u8 = 4;

/// How long the "be prepared" text shows before the countdown.
pub const PREPARATION_DELAY: Duration = Duration::from_secs(3);

/// First countdown digit.
pub const COUNTDOWN_START: u8 = 3;

/// Cadence of countdown and running ticks.
pub const TICK: Duration = Duration::from_secs(1);

/// Text shown while preparing.
pub const PREPARATION_TEXT: &str = "Be prepared to take a breath through...";
