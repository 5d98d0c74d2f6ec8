//! Ambient background audio.
//!
//! Audio is decorative: every failure here degrades to silence and the
//! breathing timer carries on regardless.
//!
//! Real output needs the `audio` cargo feature; without it (or without a
//! usable track) a [`SilentTrack`] stands in.

mod playable;
#[cfg(feature = "audio")]
mod rodio_track;
mod sync;

use std::path::Path;
use std::time::Duration;

use tracing::{info, warn};

pub use playable::{AudioError, Playable, SilentTrack};
#[cfg(feature = "audio")]
pub use rodio_track::RodioTrack;
pub use sync::{step_toward, AudioState, AudioSync, Fade, FadeStep};

/// Volume change per fade step.
pub const FADE_STEP: f32 = 0.1;

/// Time between fade steps.
pub const FADE_INTERVAL: Duration = Duration::from_millis(100);

/// Pick a backend for `track`, falling back to silence.
#[must_use]
pub fn open_track(track: Option<&Path>) -> Box<dyn Playable> {
    let Some(path) = track else {
        info!("no audio track configured");
        return Box::new(SilentTrack::new());
    };

    if !path.is_file() {
        warn!(path = %path.display(), "audio track not found, continuing silently");
        return Box::new(SilentTrack::new());
    }

    backend_for(path)
}

#[cfg(feature = "audio")]
fn backend_for(path: &Path) -> Box<dyn Playable> {
    Box::new(RodioTrack::new(path))
}

#[cfg(not(feature = "audio"))]
fn backend_for(path: &Path) -> Box<dyn Playable> {
    warn!(
        path = %path.display(),
        "built without the `audio` feature, continuing silently"
    );
    Box::new(SilentTrack::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_track_without_path_is_silent() {
        let mut track = open_track(None);
        assert!(track.load().is_ok());
        assert!(track.play().is_ok());
    }

    #[test]
    fn test_open_track_missing_file_is_silent() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut track = open_track(Some(&dir.path().join("rain.mp3")));
        assert!(track.load().is_ok());
    }
}
