use std::path::PathBuf;

use vn_core::ConfigError;

/// Alias for `Result<T, StageError>`.
pub type StageResult<T> = Result<T, StageError>;

/// Errors raised while loading a script or navigating it.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    /// No passage has this name.
    #[error("unknown passage: {0}")]
    UnknownPassage(String),

    /// A choice index outside the current passage's choices.
    #[error("choice {index} out of range ({available} available)")]
    InvalidChoice {
        /// The requested index.
        index: usize,
        /// How many choices the passage offers.
        available: usize,
    },

    /// The script file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// The file that failed to load.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The script is malformed or inconsistent.
    #[error("invalid script: {0}")]
    Script(String),

    /// The presentation configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
