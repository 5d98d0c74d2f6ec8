//! Animation math for the breathing screen.
//!
//! Nothing here touches the terminal. Positions are in a unit square with
//! the origin top-left and y growing downward.

use std::f64::consts::PI;
use std::time::Duration;

use ratatui::style::Color;

use crate::breath::{Phase, Side};

/// How long the preparation text takes to fade out.
pub const PREPARATION_FADE: Duration = Duration::from_secs(3);

/// Length of one countdown digit's fade in and out.
pub const DIGIT_PULSE: Duration = Duration::from_secs(1);

/// Fraction of `total` covered after `elapsed`, clamped to 0..=1.
#[must_use]
pub fn progress(elapsed: Duration, total: Duration) -> f64 {
    if total.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0)
}

/// Where the dot sits `progress` of the way along `phase`'s side.
#[must_use]
pub fn indicator_position(phase: Phase, progress: f64) -> (f64, f64) {
    let p = progress.clamp(0.0, 1.0);
    match phase.side() {
        Side::Top => (p, 0.0),
        Side::Right => (1.0, p),
        Side::Bottom => (1.0 - p, 1.0),
        Side::Left => (0.0, 1.0 - p),
    }
}

/// Opacity of text fading from fully visible to gone over `duration`.
#[must_use]
pub fn fade_out(elapsed: Duration, duration: Duration) -> f64 {
    1.0 - progress(elapsed, duration)
}

/// Opacity that rises to 1 at the midpoint of `period` and falls back to 0.
#[must_use]
pub fn pulse(elapsed: Duration, period: Duration) -> f64 {
    (PI * progress(elapsed, period)).sin().clamp(0.0, 1.0)
}

/// Grey level for `opacity` on a dark background.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn shade(opacity: f64) -> Color {
    let level = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::Rgb(level, level, level)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn close(a: (f64, f64), b: (f64, f64)) -> bool {
        (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
    }

    #[test]
    fn test_dot_walks_the_square_clockwise() {
        assert!(close(indicator_position(Phase::Inhale, 0.0), (0.0, 0.0)));
        assert!(close(indicator_position(Phase::Inhale, 1.0), (1.0, 0.0)));
        assert!(close(indicator_position(Phase::Hold1, 0.5), (1.0, 0.5)));
        assert!(close(indicator_position(Phase::Exhale, 0.25), (0.75, 1.0)));
        assert!(close(indicator_position(Phase::Hold2, 1.0), (0.0, 0.0)));
    }

    #[test]
    fn test_each_side_ends_where_the_next_begins() {
        for phase in Phase::ALL {
            assert!(close(
                indicator_position(phase, 1.0),
                indicator_position(phase.next(), 0.0)
            ));
        }
    }

    #[test]
    fn test_progress_clamps() {
        assert!((progress(ms(2000), ms(4000)) - 0.5).abs() < 1e-9);
        assert!((progress(ms(9000), ms(4000)) - 1.0).abs() < 1e-9);
        assert!((progress(ms(5), Duration::ZERO) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_fades() {
        assert!((fade_out(Duration::ZERO, PREPARATION_FADE) - 1.0).abs() < 1e-9);
        assert!(fade_out(PREPARATION_FADE, PREPARATION_FADE).abs() < 1e-9);

        assert!(pulse(Duration::ZERO, DIGIT_PULSE).abs() < 1e-9);
        assert!((pulse(ms(500), DIGIT_PULSE) - 1.0).abs() < 1e-9);
        assert!(pulse(ms(1000), DIGIT_PULSE).abs() < 1e-9);
    }

    #[test]
    fn test_shade() {
        assert_eq!(shade(0.0), Color::Rgb(0, 0, 0));
        assert_eq!(shade(1.0), Color::Rgb(255, 255, 255));
        assert_eq!(shade(7.0), Color::Rgb(255, 255, 255));
    }
}
