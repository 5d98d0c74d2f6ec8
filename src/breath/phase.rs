//! Breath phase driver.
//!
//! Counts each phase down 4, 3, 2, 1 and advances to the next phase on the
//! tick after 1, so a 0 is never shown.

use super::epoch::Epoch;
use super::stage::Phase;
use super::PHASE_SECONDS;

/// Result of one driver tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseStep {
    /// Same phase, one second less.
    Counted { remaining: u8 },
    /// Moved on to a new phase with a full timer.
    Advanced { phase: Phase },
}

/// Advances phase and phase timer once per second while running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseDriver {
    phase: Phase,
    remaining: u8,
    epoch: Epoch,
}

impl Default for PhaseDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseDriver {
    /// Start at Inhale with a full timer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: Phase::Inhale,
            remaining: PHASE_SECONDS,
            epoch: Epoch::new(),
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Seconds left in the current phase, always in 1..=4.
    #[must_use]
    pub const fn remaining(&self) -> u8 {
        self.remaining
    }

    /// Indicator animation epoch.
    #[must_use]
    pub const fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Back to Inhale with a full timer. The epoch keeps counting.
    pub fn reset(&mut self) {
        self.phase = Phase::Inhale;
        self.remaining = PHASE_SECONDS;
    }

    /// Advance by one second.
    pub fn tick(&mut self) -> PhaseStep {
        if self.remaining <= 1 {
            self.phase = self.phase.next();
            self.remaining = PHASE_SECONDS;
            self.epoch.bump();
            PhaseStep::Advanced { phase: self.phase }
        } else {
            self.remaining -= 1;
            PhaseStep::Counted {
                remaining: self.remaining,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_down_then_advances() {
        let mut driver = PhaseDriver::new();
        assert_eq!(driver.remaining(), 4);

        assert_eq!(driver.tick(), PhaseStep::Counted { remaining: 3 });
        assert_eq!(driver.tick(), PhaseStep::Counted { remaining: 2 });
        assert_eq!(driver.tick(), PhaseStep::Counted { remaining: 1 });
        assert_eq!(driver.tick(), PhaseStep::Advanced { phase: Phase::Hold1 });
        assert_eq!(driver.remaining(), 4);
        assert_eq!(driver.epoch().value(), 1);
    }

    #[test]
    fn test_sixteen_ticks_are_four_cycles() {
        let mut driver = PhaseDriver::new();
        let mut phases = Vec::new();

        for _ in 0..16 {
            phases.push(driver.phase());
            driver.tick();
            assert!((1..=4).contains(&driver.remaining()));
        }

        let expected: Vec<Phase> = Phase::ALL
            .iter()
            .flat_map(|p| std::iter::repeat(*p).take(4))
            .collect();
        assert_eq!(phases, expected);
        assert_eq!(driver.phase(), Phase::Inhale);
        assert_eq!(driver.epoch().value(), 4);
    }

    #[test]
    fn test_reset_keeps_epoch() {
        let mut driver = PhaseDriver::new();
        for _ in 0..6 {
            driver.tick();
        }
        driver.reset();

        assert_eq!(driver.phase(), Phase::Inhale);
        assert_eq!(driver.remaining(), 4);
        assert_eq!(driver.epoch().value(), 1);
    }
}
