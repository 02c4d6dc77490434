use vn_core::{Voice, report_playback_failure};

/// Whether revealing `ch` at `index` plays a cue: every other character,
/// never for whitespace.
pub fn is_cue_position(index: usize, ch: char) -> bool {
    index % 2 == 0 && !ch.is_whitespace()
}

/// Fixed set of cue voices reused round-robin.
///
/// Slot `(index / 2) % capacity` plays the cue for character `index`, so at
/// most `capacity` cues overlap. A reused voice simply gets its source
/// overwritten.
#[derive(Debug)]
pub struct SoundPool<V> {
    voices: Vec<V>,
    source: String,
}

impl<V: Voice> SoundPool<V> {
    /// Create a pool over `voices`, all playing `source`.
    pub fn new(voices: Vec<V>, source: impl Into<String>) -> Self {
        Self {
            voices,
            source: source.into(),
        }
    }

    /// Number of voices.
    pub fn capacity(&self) -> usize {
        self.voices.len()
    }

    /// The cue sample.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The slot that plays the cue for character `index`.
    pub fn slot_for(&self, index: usize) -> Option<usize> {
        match self.voices.len() {
            0 => None,
            n => Some((index / 2) % n),
        }
    }

    /// Play the cue for character `index`. Returns the slot used.
    ///
    /// A refused or failed start is logged and otherwise ignored.
    pub fn cue(&mut self, index: usize) -> Option<usize> {
        let slot = self.slot_for(index)?;
        let voice = self.voices.get_mut(slot)?;
        voice.set_source(&self.source);
        if let Err(error) = voice.play() {
            report_playback_failure("talk", Some(&self.source), &error);
        }
        Some(slot)
    }

    /// The voices, by slot.
    pub fn voices(&self) -> &[V] {
        &self.voices
    }
}
