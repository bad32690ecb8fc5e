//! Capability configuration errors.
//!
//! These are startup errors: the process must not serve decisions without a
//! loaded capability map, so every variant here is fatal to the caller.

use thiserror::Error;

/// Failure while loading the capability configuration.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// The capability file could not be read.
    #[error("failed to read capability config {path}: {reason}")]
    Read {
        /// Path we tried to read.
        path: String,
        /// Underlying I/O error text.
        reason: String,
    },

    /// The capability file is not valid JSON or has the wrong shape.
    #[error("failed to parse capability config {path}: {reason}")]
    Parse {
        /// Path we tried to parse.
        path: String,
        /// Underlying parse error text.
        reason: String,
    },

    /// Two device descriptors share an id.
    #[error("duplicate device id in capability config: {0}")]
    DuplicateDevice(String),
}
