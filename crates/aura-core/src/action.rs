//! Action and suggestion types.
//!
//! [`CandidateAction`] is rule-derived and ephemeral; [`ActionCommand`] is
//! proposed by the reasoner and gated by the policy validator;
//! [`Suggestion`] is the pipeline's terminal artifact.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Deterministic, rule-derived proposal of a possible device action.
///
/// Produced only by the rule engine, consumed only as reasoner input.
/// Never persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateAction {
    /// Action-type tag (`turn_off_room_lights`, ...).
    pub action_type: String,
    /// Target device ids, sorted.
    pub target_devices: Vec<String>,
    /// Human-readable rationale.
    pub reason: String,
}

/// A concrete device command proposed by the reasoner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionCommand {
    /// Target device id.
    pub device_id: String,
    /// Command name (must be in the device's capability whitelist).
    pub command: String,
    /// Parameter name → value.
    #[serde(default)]
    pub params: serde_json::Map<String, Value>,
}

fn default_suggestion_confidence() -> Option<f64> {
    Some(0.5)
}

/// Final arbitration output delivered to the caller.
///
/// A deny is communicated through `should_suggest` and `reason`, never as a
/// transport-level error.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Whether a suggestion should surface to the user.
    pub should_suggest: bool,
    /// Text to show the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion_text: Option<String>,
    /// Why the suggestion was made, or why it was suppressed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Device action to run if the user accepts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<ActionCommand>,
    /// Reasoner confidence in [0, 1].
    #[serde(default = "default_suggestion_confidence")]
    pub confidence: Option<f64>,
}

impl Suggestion {
    /// A deny with a fixed reason and zero confidence.
    ///
    /// Used wherever the pipeline absorbs a failure into a safe negative
    /// outcome.
    #[must_use]
    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            should_suggest: false,
            suggestion_text: None,
            reason: Some(reason.into()),
            action: None,
            confidence: Some(0.0),
        }
    }

    /// Suppress this suggestion in place, overwriting the reason.
    ///
    /// The suggestion text and action are retained for logging and audit.
    pub fn suppress(&mut self, reason: impl Into<String>) {
        self.should_suggest = false;
        self.reason = Some(reason.into());
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
