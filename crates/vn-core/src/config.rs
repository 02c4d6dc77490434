use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::audio::Level;
use crate::error::{ConfigError, ConfigResult};

/// Default cue sample played while text is revealed.
pub const DEFAULT_CUE_SOURCE: &str = "twinemedia/sound/talk_default.wav";
/// Default background track.
pub const DEFAULT_MUSIC_SOURCE: &str = "twinemedia/music/theme.ogg";

/// Configuration for the presentation layer.
///
/// Every field has a default, so a JSON file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PresentationConfig {
    /// Milliseconds between two revealed characters.
    pub char_interval_ms: u64,
    /// Milliseconds between two fade steps.
    pub fade_interval_ms: u64,
    /// Number of cue voices reused round-robin.
    pub cue_pool_size: usize,
    /// Volume a fade-in starts at.
    pub initial_volume: f32,
    /// Volume a fade-in ends at.
    pub ceiling_volume: f32,
    /// Sample played for character cues.
    pub cue_source: String,
    /// Track played when a passage asks for music without naming one.
    pub music_source: String,
    /// Maximum journal size (oldest entries dropped when exceeded). 0 = unlimited.
    pub journal_capacity: usize,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            char_interval_ms: 30,
            fade_interval_ms: 20,
            cue_pool_size: 5,
            initial_volume: 0.1,
            ceiling_volume: 1.0,
            cue_source: DEFAULT_CUE_SOURCE.to_string(),
            music_source: DEFAULT_MUSIC_SOURCE.to_string(),
            journal_capacity: 0,
        }
    }
}

impl PresentationConfig {
    /// Set the per-character reveal interval.
    pub fn with_char_interval(mut self, interval: Duration) -> Self {
        self.char_interval_ms = duration_ms(interval);
        self
    }

    /// Set the fade step interval.
    pub fn with_fade_interval(mut self, interval: Duration) -> Self {
        self.fade_interval_ms = duration_ms(interval);
        self
    }

    /// Set the number of cue voices.
    pub fn with_cue_pool_size(mut self, size: usize) -> Self {
        self.cue_pool_size = size;
        self
    }

    /// Set the fade-in start and end volumes.
    pub fn with_volume_range(mut self, initial: f32, ceiling: f32) -> Self {
        self.initial_volume = initial;
        self.ceiling_volume = ceiling;
        self
    }

    /// Set the cue sample.
    pub fn with_cue_source(mut self, source: impl Into<String>) -> Self {
        self.cue_source = source.into();
        self
    }

    /// Set the default music track.
    pub fn with_music_source(mut self, source: impl Into<String>) -> Self {
        self.music_source = source.into();
        self
    }

    /// Set the maximum journal size (0 = unlimited).
    pub fn with_journal_capacity(mut self, capacity: usize) -> Self {
        self.journal_capacity = capacity;
        self
    }

    /// Interval between revealed characters.
    pub fn char_interval(&self) -> Duration {
        Duration::from_millis(self.char_interval_ms)
    }

    /// Interval between fade steps.
    pub fn fade_interval(&self) -> Duration {
        Duration::from_millis(self.fade_interval_ms)
    }

    /// Quantized fade-in start level.
    pub fn initial_level(&self) -> Level {
        Level::from_volume(self.initial_volume)
    }

    /// Quantized fade-in end level.
    pub fn ceiling_level(&self) -> Level {
        Level::from_volume(self.ceiling_volume)
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(text: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a JSON configuration file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.char_interval_ms == 0 {
            return Err(ConfigError::Invalid("char_interval_ms must be positive".into()));
        }
        if self.fade_interval_ms == 0 {
            return Err(ConfigError::Invalid("fade_interval_ms must be positive".into()));
        }
        if self.cue_pool_size == 0 {
            return Err(ConfigError::Invalid("cue_pool_size must be at least 1".into()));
        }
        for (name, volume) in [
            ("initial_volume", self.initial_volume),
            ("ceiling_volume", self.ceiling_volume),
        ] {
            if !(0.0..=1.0).contains(&volume) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be within 0.0..=1.0, got {volume}"
                )));
            }
        }
        if self.initial_level() >= self.ceiling_level() {
            return Err(ConfigError::Invalid(format!(
                "initial_volume ({}) must be below ceiling_volume ({})",
                self.initial_level(),
                self.ceiling_level()
            )));
        }
        Ok(())
    }
}

fn duration_ms(interval: Duration) -> u64 {
    u64::try_from(interval.as_millis()).unwrap_or(u64::MAX)
}
