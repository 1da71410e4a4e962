//! Error types

use std::path::PathBuf;

/// Failures saving or restoring a session
#[derive(thiserror::Error, Debug)]
pub enum PersistError {
    /// No save exists to load
    #[error("no saved game found")]
    MissingSaveFile,

    /// A save exists but does not decode into a session
    #[error("saved game is corrupt: {0}")]
    CorruptSaveFile(String),

    /// Reading or writing the save failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures loading or writing the settings file
#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("cannot access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid setting: {0}")]
    Invalid(String),
}
