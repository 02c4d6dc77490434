//! In-memory [`Voice`] that records every call.

use vn_core::{PlaybackError, Voice};

use crate::log::{Call, CallLog};

/// A voice that tracks its state and records every call into a [`CallLog`].
///
/// Can be told to refuse playback, as a platform does before the first user
/// gesture.
#[derive(Debug, Clone)]
pub struct RecordingVoice {
    id: usize,
    source: Option<String>,
    paused: bool,
    volume: f32,
    looping: bool,
    refusal: Option<PlaybackError>,
    log: CallLog,
}

impl RecordingVoice {
    /// A paused voice at full volume, identified as `id` in the log.
    pub fn new(id: usize, log: CallLog) -> Self {
        Self {
            id,
            source: None,
            paused: true,
            volume: 1.0,
            looping: false,
            refusal: None,
            log,
        }
    }

    /// Refuse every `play` with `error`.
    pub fn refusing(mut self, error: PlaybackError) -> Self {
        self.refusal = Some(error);
        self
    }

    /// Allow playback again.
    pub fn grant(&mut self) {
        self.refusal = None;
    }

    /// Whether the voice loops.
    pub fn is_looping(&self) -> bool {
        self.looping
    }
}

impl Voice for RecordingVoice {
    fn set_source(&mut self, source: &str) {
        self.source = Some(source.to_string());
        self.log.push(Call::SetSource {
            voice: self.id,
            source: source.to_string(),
        });
    }

    fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        let accepted = self.refusal.is_none();
        self.log.push(Call::Play {
            voice: self.id,
            accepted,
        });
        match &self.refusal {
            Some(error) => Err(error.clone()),
            None => {
                self.paused = false;
                Ok(())
            }
        }
    }

    fn pause(&mut self) {
        self.paused = true;
        self.log.push(Call::Pause { voice: self.id });
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        self.log.push(Call::SetVolume {
            voice: self.id,
            volume,
        });
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
        self.log.push(Call::SetLooping {
            voice: self.id,
            looping,
        });
    }
}

/// `count` voices with ids `0..count`, all logging into `log`.
pub fn recording_voices(count: usize, log: &CallLog) -> Vec<RecordingVoice> {
    (0..count)
        .map(|id| RecordingVoice::new(id, log.clone()))
        .collect()
}
