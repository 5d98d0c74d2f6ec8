//! Animation replay counters.

use serde::{Deserialize, Serialize};

/// Monotonic counter that tells a renderer to restart an animation.
///
/// The value means nothing on its own; only a change is significant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Epoch(u64);

impl Epoch {
    /// The first epoch.
    #[must_use]
    pub const fn new() -> Self {
        Self(0)
    }

    /// Advance to the next epoch.
    pub fn bump(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }

    /// Raw counter value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

/// One epoch per animated element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Epochs {
    /// Travelling dot on the square.
    pub indicator: Epoch,
    /// "Be prepared" text.
    pub preparation: Epoch,
    /// Countdown digit.
    pub countdown: Epoch,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bump_is_monotonic() {
        let mut epoch = Epoch::default();
        let before = epoch;
        epoch.bump();
        epoch.bump();
        assert!(epoch > before);
        assert_eq!(epoch.value(), 2);
    }

    #[test]
    fn test_serializes_as_number() {
        let mut epoch = Epoch::default();
        epoch.bump();
        assert_eq!(serde_json::to_string(&epoch).unwrap(), "1");
    }
}
