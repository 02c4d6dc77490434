//! Composition root for the vn presentation layer.
//!
//! A [`Stage`] plays a branching [`Script`]: it owns one virtual-time timer
//! queue shared by the typewriter reveal and the music controller, a
//! headless [`Page`], and a [`Journal`] of everything that happened.

/// Error types for the stage crate.
pub mod error;
/// Stage events and the bounded journal.
pub mod journal;
/// Headless page and its journaling surface adapter.
pub mod page;
/// Script, passage, and choice definitions.
pub mod script;
/// The stage itself.
pub mod stage;

/// Re-exports of [`error::StageError`] and [`error::StageResult`].
pub use error::{StageError, StageResult};
/// Re-exports of the journal types.
pub use journal::{Journal, StageEvent, StageEventKind};
/// Re-exports of the page types.
pub use page::{JournalingSurface, Page};
/// Re-exports of the script types.
pub use script::{Choice, MusicCue, Passage, Script};
/// Re-exports of [`stage::Stage`] and [`stage::Owner`].
pub use stage::{Owner, Stage};
