//! The playable resource the synchronizer drives.
//!
//! The asset is opaque: load it, play and pause it, and read or set its volume,
//! position and mute flag.

use std::time::Duration;

use thiserror::Error;

/// Failures from an audio backend.
///
/// These never leave the audio module; the synchronizer logs and drops them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// No output device or no asset.
    #[error("Audio unavailable: {0}")]
    Unavailable(String),

    /// The backend refused to start playback.
    #[error("Playback rejected: {0}")]
    PlaybackRejected(String),

    /// The asset could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),
}

/// A single looping track.
#[cfg_attr(test, mockall::automock)]
pub trait Playable {
    /// Prepare the asset for playback.
    ///
    /// # Errors
    ///
    /// Returns an error if the asset cannot be opened or decoded.
    fn load(&mut self) -> Result<(), AudioError>;

    /// Start or resume playback.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend refuses to play.
    fn play(&mut self) -> Result<(), AudioError>;

    /// Pause playback, keeping the position.
    fn pause(&mut self);

    /// Whether audio is currently playing.
    fn is_playing(&self) -> bool;

    /// Output volume in 0.0..=1.0.
    fn volume(&self) -> f32;

    fn set_volume(&mut self, volume: f32);

    /// Playback position from the start of the track.
    fn position(&self) -> Duration;

    /// Seek to `position`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot seek.
    fn set_position(&mut self, position: Duration) -> Result<(), AudioError>;

    fn is_muted(&self) -> bool;

    fn set_muted(&mut self, muted: bool);
}

/// A track with no output.
///
/// Used when audio is disabled, no asset is configured or the asset is
/// missing. It keeps its state so snapshots stay meaningful.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SilentTrack {
    loaded: bool,
    playing: bool,
    volume: f32,
    position: Duration,
    muted: bool,
}

impl SilentTrack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Playable for SilentTrack {
    fn load(&mut self) -> Result<(), AudioError> {
        self.loaded = true;
        Ok(())
    }

    fn play(&mut self) -> Result<(), AudioError> {
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    fn position(&self) -> Duration {
        self.position
    }

    fn set_position(&mut self, position: Duration) -> Result<(), AudioError> {
        self.position = position;
        Ok(())
    }

    fn is_muted(&self) -> bool {
        self.muted
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_track_records_state() {
        let mut track = SilentTrack::new();
        track.load().unwrap();
        track.play().unwrap();
        track.set_volume(1.7);
        track.set_muted(true);

        assert!(track.is_playing());
        assert!((track.volume() - 1.0).abs() < f32::EPSILON);
        assert!(track.is_muted());

        track.pause();
        assert!(!track.is_playing());
    }

    #[test]
    fn test_audio_error_messages() {
        let err = AudioError::PlaybackRejected("no gesture".to_string());
        assert_eq!(err.to_string(), "Playback rejected: no gesture");
    }
}
