//! Typewriter text reveal for the vn presentation layer.
//!
//! [`RevealEngine`] reveals a queue of lines one character per tick, plays a
//! short cue from a round-robin [`SoundPool`] every other character, holds
//! between lines until the player continues, and shows the choice controls
//! once the last line is out.

/// Tagged reveal cursor.
pub mod cursor;
/// The reveal engine.
pub mod engine;
/// Round-robin pool of cue voices.
pub mod pool;
/// Line queue and cursor transitions of one reveal sequence.
pub mod session;

pub use cursor::Cursor;
pub use engine::RevealEngine;
pub use pool::{SoundPool, is_cue_position};
pub use session::{RevealSession, Step};
