//! Session stages and breath phases.

use serde::{Deserialize, Serialize};

/// Coarse session lifecycle.
///
/// ```text
/// Idle --start--> Preparing --3s--> Countdown --3 ticks--> Running
///  ^                  |                 |                     |
///  +------stop--------+-------stop------+--------stop---------+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Waiting for the user. Initial state.
    #[default]
    Idle,
    /// "Be prepared" text is showing.
    Preparing,
    /// Counting 3, 2, 1.
    Countdown,
    /// Cycling through the breath phases.
    Running,
}

impl Stage {
    /// Whether `self -> next` is an edge of the lifecycle.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Preparing)
                | (Self::Preparing, Self::Countdown)
                | (Self::Countdown, Self::Running)
                | (Self::Preparing | Self::Countdown | Self::Running, Self::Idle)
        )
    }

    /// Whether a session is in progress.
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Get display name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Preparing => "Preparing",
            Self::Countdown => "Countdown",
            Self::Running => "Running",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Side of the square a phase travels along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

/// One of the four breath phases, in cycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Inhale,
    Hold1,
    Exhale,
    Hold2,
}

impl Phase {
    /// All phases in cycle order.
    pub const ALL: [Self; 4] = [Self::Inhale, Self::Hold1, Self::Exhale, Self::Hold2];

    /// Position in the cycle (0..4).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Inhale => 0,
            Self::Hold1 => 1,
            Self::Exhale => 2,
            Self::Hold2 => 3,
        }
    }

    /// Phase at `index`, wrapping modulo 4.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    /// The phase that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Label shown next to the square.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Inhale => "Inhale",
            Self::Hold1 | Self::Hold2 => "Hold",
            Self::Exhale => "Exhale",
        }
    }

    /// Side of the square the indicator travels during this phase.
    #[must_use]
    pub const fn side(self) -> Side {
        match self {
            Self::Inhale => Side::Top,
            Self::Hold1 => Side::Right,
            Self::Exhale => Side::Bottom,
            Self::Hold2 => Side::Left,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
