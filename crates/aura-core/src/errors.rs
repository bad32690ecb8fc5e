//! Context validation errors.

use thiserror::Error;

/// Invariant violations in an inbound [`crate::ContextPacket`].
#[derive(Debug, Error)]
pub enum ContextError {
    /// Two devices in one packet share an id.
    #[error("duplicate device id in context packet: {0}")]
    DuplicateDeviceId(String),

    /// A confidence field is outside [0, 1].
    #[error("confidence field {field} out of range [0, 1]: {value}")]
    ConfidenceOutOfRange {
        /// Dotted path of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
}
