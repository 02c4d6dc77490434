//! Background music for the vn presentation layer.
//!
//! [`FadeController`] owns one looping music channel. Starting a track fades
//! the current one out to silence, pauses it, and only then fades the new
//! one in; stopping fades out and notifies the caller. Volume moves in tenths,
//! one step per tick.

/// The music controller.
pub mod controller;
/// Fade phases and what follows a fade-out.
pub mod fade;

pub use controller::FadeController;
pub use fade::{AfterFadeOut, Completion, FadePhase};
