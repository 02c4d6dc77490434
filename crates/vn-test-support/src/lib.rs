//! Shared test doubles for the vn crates.
//!
//! Every double writes into a [`CallLog`]; handing the same log to a surface
//! and several voices gives one ordered record of everything the engine did.

mod log;
mod surface;
mod voice;

pub use log::{Call, CallLog};
pub use surface::RecordingSurface;
pub use voice::{RecordingVoice, recording_voices};
