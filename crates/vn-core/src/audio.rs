use crate::error::PlaybackError;

/// One playable audio output: a short cue player or the music channel.
///
/// Mirrors the capabilities a media element offers: assign a source, start,
/// pause, and adjust volume. Implementations must not panic when playback is
/// refused; they return [`PlaybackError`] from [`play`](Self::play) instead.
pub trait Voice {
    /// Assign the source to play next. Replaces whatever was assigned.
    fn set_source(&mut self, source: &str);

    /// The currently assigned source, if any.
    fn source(&self) -> Option<&str>;

    /// Start or resume playback of the assigned source.
    fn play(&mut self) -> Result<(), PlaybackError>;

    /// Pause playback.
    fn pause(&mut self);

    /// Whether the voice is currently paused (or was never started).
    fn is_paused(&self) -> bool;

    /// Set the output volume, `0.0..=1.0`.
    fn set_volume(&mut self, volume: f32);

    /// The current output volume.
    fn volume(&self) -> f32;

    /// Whether playback restarts from the beginning when it ends.
    fn set_looping(&mut self, looping: bool);
}

/// Log a playback failure without propagating it.
///
/// A refused start is expected until the player first interacts with the
/// page, so it gets its own hint; anything else is logged as-is.
pub fn report_playback_failure(context: &str, source: Option<&str>, error: &PlaybackError) {
    match error {
        PlaybackError::NotAllowed => tracing::warn!(
            context,
            source = source.unwrap_or_default(),
            "{context}: allow media for sound to come through"
        ),
        other => tracing::warn!(
            context,
            source = source.unwrap_or_default(),
            error = %other,
            "{context}: playback failed"
        ),
    }
}

/// Volume quantized to tenths: an integer step `0..=10`.
///
/// Fades move one step per tick, so a fade always takes the same number of
/// ticks no matter how much real time passes between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Level(u8);

impl Level {
    /// Silence.
    pub const SILENT: Level = Level(0);
    /// Full volume.
    pub const FULL: Level = Level(10);

    /// Create a level from a step, clamped to `0..=10`.
    pub fn new(step: u8) -> Self {
        Self(step.min(Self::FULL.0))
    }

    /// The level at or below a continuous volume. Truncates, so a volume
    /// between two steps starts from the lower one.
    pub fn from_volume(volume: f32) -> Self {
        // The slack absorbs f32 error in values such as 0.7 * 10.
        let step = (volume.clamp(0.0, 1.0) * 10.0 + 1e-4).floor() as u8;
        Self::new(step)
    }

    /// The integer step.
    pub fn step(self) -> u8 {
        self.0
    }

    /// The continuous volume this level stands for.
    pub fn volume(self) -> f32 {
        f32::from(self.0) / 10.0
    }

    /// One step louder, saturating at full.
    pub fn up(self) -> Self {
        Self::new(self.0.saturating_add(1))
    }

    /// One step quieter, saturating at silence.
    pub fn down(self) -> Self {
        Self(self.0.saturating_sub(1))
    }

    /// Whether this is silence.
    pub fn is_silent(self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}", self.volume())
    }
}
