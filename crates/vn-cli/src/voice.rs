//! Silent voices for the terminal: they keep playback state so the status
//! bar can show it, but make no sound.

use std::cell::Cell;
use std::rc::Rc;

use vn_core::{PlaybackError, Voice};

/// Whether the player has interacted yet. Shared by every voice.
#[derive(Debug, Clone)]
pub struct Gesture(Rc<Cell<bool>>);

impl Gesture {
    /// Sound allowed from the start.
    pub fn granted() -> Self {
        Self(Rc::new(Cell::new(true)))
    }

    /// Sound refused until [`grant`](Self::grant).
    pub fn pending() -> Self {
        Self(Rc::new(Cell::new(false)))
    }

    pub fn grant(&self) {
        if !self.0.replace(true) {
            tracing::info!("player interacted, sound allowed");
        }
    }

    pub fn is_granted(&self) -> bool {
        self.0.get()
    }
}

#[derive(Debug, Clone)]
pub struct ConsoleVoice {
    source: Option<String>,
    paused: bool,
    volume: f32,
    looping: bool,
    gesture: Gesture,
}

impl ConsoleVoice {
    pub fn new(gesture: Gesture) -> Self {
        Self {
            source: None,
            paused: true,
            volume: 1.0,
            looping: false,
            gesture,
        }
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }
}

impl Voice for ConsoleVoice {
    fn set_source(&mut self, source: &str) {
        self.source = Some(source.to_string());
    }

    fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        if !self.gesture.is_granted() {
            return Err(PlaybackError::NotAllowed);
        }
        if self.source.is_none() {
            return Err(PlaybackError::Unsupported("no source assigned".into()));
        }
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refuses_until_granted() {
        let gesture = Gesture::pending();
        let mut voice = ConsoleVoice::new(gesture.clone());
        voice.set_source("a.ogg");
        assert_eq!(voice.play(), Err(PlaybackError::NotAllowed));
        assert!(voice.is_paused());

        gesture.grant();
        assert_eq!(voice.play(), Ok(()));
        assert!(!voice.is_paused());
    }

    #[test]
    fn play_without_source_fails() {
        let mut voice = ConsoleVoice::new(Gesture::granted());
        assert!(matches!(voice.play(), Err(PlaybackError::Unsupported(_))));
    }
}
