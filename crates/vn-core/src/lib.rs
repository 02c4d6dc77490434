//! Core types for the vn presentation layer.
//!
//! Holds everything the reveal engine and the music controller share without
//! depending on each other: a deterministic virtual-time timer queue, the
//! render boundary ([`Surface`]), the audio boundary ([`Voice`]), the
//! quantized volume [`Level`], configuration, and error types.

/// Audio boundary: playable voices and quantized volume levels.
pub mod audio;
/// Virtual clock tracking elapsed time and fired ticks.
pub mod clock;
/// Presentation configuration and its JSON loader.
pub mod config;
/// Error types used throughout the crate.
pub mod error;
/// Render boundary: the text region and the player controls.
pub mod surface;
/// Cancellable one-shot and repeating timers.
pub mod timer;

/// Re-export audio boundary types.
pub use audio::{Level, Voice, report_playback_failure};
/// Re-export of [`clock::VirtualClock`].
pub use clock::VirtualClock;
/// Re-export of [`config::PresentationConfig`].
pub use config::PresentationConfig;
/// Re-export error types.
pub use error::{ConfigError, ConfigResult, PlaybackError};
/// Re-export render boundary types.
pub use surface::{Surface, TickContext, Visibility};
/// Re-export timer types.
pub use timer::{Fired, Lane, TimerHandle, TimerQueue, Timers};
