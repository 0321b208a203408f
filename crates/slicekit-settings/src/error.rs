//! Error types for the settings crate.
//!
//! File errors keep the path they were raised for and the underlying
//! `io::Error` as their source.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during settings operations.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("Failed to read settings from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The settings file could not be written.
    #[error("Failed to write settings to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The directory for the settings file could not be created.
    #[error("Failed to create settings directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Neither a config nor a home directory is known for this user.
    #[error("No configuration directory available on this system")]
    NoConfigDirectory,

    /// A configuration value is invalid.
    #[error("Invalid setting '{key}': {reason}")]
    InvalidSetting { key: String, reason: String },

    /// Malformed JSON settings.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed TOML settings.
    #[error("TOML error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Settings that cannot be rendered as TOML.
    #[error("TOML error: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    /// The slicer section is unusable.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Problems with the slicer section of the settings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Settings file extension other than `.toml` / `.json`.
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// A required argument placeholder is missing from the slicer arguments.
    #[error("Slicer arguments must contain the {0} placeholder")]
    MissingPlaceholder(String),

    /// A timeout of zero seconds would kill every run.
    #[error("Slicer timeout must be at least one second")]
    ZeroTimeout,
}

/// Result type alias for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;
