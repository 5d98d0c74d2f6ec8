//! Looping file playback through rodio.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};
use tracing::debug;

use super::playable::{AudioError, Playable};

/// A looping audio file on the default output device.
///
/// The device is opened lazily on [`Playable::load`], so constructing one
/// never fails.
pub struct RodioTrack {
    path: PathBuf,
    // `sink` must be declared before `stream` so it is dropped first
    sink: Option<Sink>,
    stream: Option<OutputStream>,
    volume: f32,
    muted: bool,
}

impl RodioTrack {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sink: None,
            stream: None,
            volume: 0.0,
            muted: false,
        }
    }

    fn sink(&self) -> Result<&Sink, AudioError> {
        self.sink
            .as_ref()
            .ok_or_else(|| AudioError::Unavailable("track not loaded".to_string()))
    }

    fn apply_volume(&self) {
        if let Some(sink) = &self.sink {
            sink.set_volume(if self.muted { 0.0 } else { self.volume });
        }
    }
}

fn append_looping(sink: &Sink, path: &Path) -> Result<(), AudioError> {
    let file = File::open(path)
        .map_err(|e| AudioError::Unavailable(format!("{}: {e}", path.display())))?;
    let decoder = Decoder::new(BufReader::new(file))
        .map_err(|e| AudioError::Decode(format!("{}: {e}", path.display())))?;
    sink.append(decoder.repeat_infinite());
    Ok(())
}

impl Playable for RodioTrack {
    fn load(&mut self) -> Result<(), AudioError> {
        if self.sink.is_some() {
            return Ok(());
        }

        let (stream, handle) =
            OutputStream::try_default().map_err(|e| AudioError::Unavailable(e.to_string()))?;
        let sink = Sink::try_new(&handle).map_err(|e| AudioError::Unavailable(e.to_string()))?;
        sink.pause();
        append_looping(&sink, &self.path)?;

        debug!(path = %self.path.display(), "audio track loaded");
        self.sink = Some(sink);
        self.stream = Some(stream);
        self.apply_volume();
        Ok(())
    }

    fn play(&mut self) -> Result<(), AudioError> {
        let sink = self.sink()?;
        if sink.empty() {
            return Err(AudioError::PlaybackRejected("nothing queued".to_string()));
        }
        sink.play();
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn is_playing(&self) -> bool {
        self.sink
            .as_ref()
            .is_some_and(|sink| !sink.is_paused() && !sink.empty())
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        self.apply_volume();
    }

    fn position(&self) -> Duration {
        self.sink
            .as_ref()
            .map_or(Duration::ZERO, Sink::get_pos)
    }

    fn set_position(&mut self, position: Duration) -> Result<(), AudioError> {
        let sink = self.sink()?;
        match sink.try_seek(position) {
            Ok(()) => Ok(()),
            Err(e) if position.is_zero() => {
                // Looping sources may not seek; requeue from the top instead.
                debug!(error = %e, "seek failed, requeueing track");
                let paused = sink.is_paused();
                sink.clear();
                append_looping(sink, &self.path)?;
                if !paused {
                    sink.play();
                }
                Ok(())
            }
            Err(e) => Err(AudioError::Unavailable(e.to_string())),
        }
    }

    fn is_muted(&self) -> bool {
        self.muted
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.apply_volume();
    }
}
