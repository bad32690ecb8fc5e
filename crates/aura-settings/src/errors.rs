//! Settings loading errors.

use thiserror::Error;

/// Failure while loading or merging the settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The file exists but could not be read.
    #[error("failed to read settings file {path}: {reason}")]
    Read {
        /// Path we tried to read.
        path: String,
        /// Underlying I/O error text.
        reason: String,
    },

    /// The file is not valid JSON or does not match the settings schema.
    #[error("failed to parse settings file {path}: {reason}")]
    Parse {
        /// Path we tried to parse.
        path: String,
        /// Underlying parse error text.
        reason: String,
    },

    /// An `AURA_*` environment variable holds an unparseable value.
    #[error("invalid value for {var}: {value}")]
    EnvOverride {
        /// Variable name.
        var: &'static str,
        /// The rejected value.
        value: String,
    },
}
