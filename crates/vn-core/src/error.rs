use std::path::PathBuf;

/// Alias for `Result<T, ConfigError>`.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Reasons a voice can refuse to start playback.
///
/// None of these ever reach the caller of the reveal engine or the music
/// controller; they are reported through [`crate::report_playback_failure`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlaybackError {
    /// The platform requires a user gesture before audio may start.
    #[error("playback not allowed until the player interacts with the page")]
    NotAllowed,

    /// The assigned source cannot be decoded or found.
    #[error("unsupported source: {0}")]
    Unsupported(String),

    /// Any other backend failure.
    #[error("audio backend error: {0}")]
    Backend(String),
}

/// Errors that can occur when loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// The file that failed to load.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration text is not valid JSON for this schema.
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of its allowed range.
    #[error("invalid configuration value: {0}")]
    Invalid(String),
}
