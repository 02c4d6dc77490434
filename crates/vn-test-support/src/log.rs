//! Ordered call log shared between test doubles.

use std::cell::RefCell;
use std::rc::Rc;

use vn_core::Visibility;

/// One recorded call on a surface or a voice.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    /// The text region was cleared.
    ClearText,
    /// A character was appended to the text region.
    AppendChar(char),
    /// The continue control changed visibility.
    SetContinue(Visibility),
    /// The choice controls changed visibility.
    SetChoices(Visibility),
    /// A voice was assigned a source.
    SetSource {
        /// Which voice.
        voice: usize,
        /// The assigned source.
        source: String,
    },
    /// A voice was asked to start playback.
    Play {
        /// Which voice.
        voice: usize,
        /// Whether the voice accepted.
        accepted: bool,
    },
    /// A voice was paused.
    Pause {
        /// Which voice.
        voice: usize,
    },
    /// A voice's volume changed.
    SetVolume {
        /// Which voice.
        voice: usize,
        /// The new volume.
        volume: f32,
    },
    /// A voice's looping flag changed.
    SetLooping {
        /// Which voice.
        voice: usize,
        /// The new flag.
        looping: bool,
    },
}

/// Cloneable handle to a shared, ordered list of [`Call`]s.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<Call>>>);

impl CallLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a call.
    pub fn push(&self, call: Call) {
        self.0.borrow_mut().push(call);
    }

    /// Snapshot of every call so far.
    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().clone()
    }

    /// Forget every call so far.
    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// Characters appended so far, in order.
    pub fn appended_text(&self) -> String {
        self.0
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::AppendChar(ch) => Some(*ch),
                _ => None,
            })
            .collect()
    }

    /// Volumes set on `voice`, in order.
    pub fn volumes(&self, voice: usize) -> Vec<f32> {
        self.0
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::SetVolume { voice: v, volume } if *v == voice => Some(*volume),
                _ => None,
            })
            .collect()
    }

    /// Voices asked to play, in order.
    pub fn plays(&self) -> Vec<usize> {
        self.0
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::Play { voice, .. } => Some(*voice),
                _ => None,
            })
            .collect()
    }
}
