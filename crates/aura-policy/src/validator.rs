//! Action safety validation.
//!
//! The last line of defense between a reasoner-generated suggestion and
//! physical device actuation. Clauses run in order and fail fast on the
//! first violation:
//!
//! 1. Device existence
//! 2. Protected-device blacklist (absolute — capability data cannot
//!    override it)
//! 3. Capability presence (no capability data means no checkable guarantee)
//! 4. Command whitelist
//! 5. Per-parameter bounds (numeric range / enum membership / format)
//!
//! Parameters the spec does not declare, and spec shapes the validator does
//! not understand, are skipped with a debug diagnostic rather than failed.
//! That soft-fail is load-bearing for forward compatibility; the tests pin
//! it so any hardening is a deliberate change.

use std::sync::LazyLock;

use metrics::counter;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use aura_core::{ActionCommand, DeviceState, FormatToken, ParamSpec};

/// Device-id substrings that must never be actuated, regardless of
/// capability data.
pub const PROTECTED_DEVICE_SUBSTRINGS: [&str; 3] = ["router", "refrigerator", "security_camera"];

static HOURS_MINUTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}:\d{2}$").expect("static pattern"));

/// The specific clause that rejected an action.
#[derive(Debug, Error, PartialEq)]
pub enum PolicyViolation {
    /// Device id not present in the context's device set.
    #[error("unknown device {device_id}")]
    UnknownDevice {
        /// Targeted device id.
        device_id: String,
    },

    /// Device id contains a protected substring.
    #[error("device {device_id} is protected (matched {matched:?})")]
    ProtectedDevice {
        /// Targeted device id.
        device_id: String,
        /// The blacklist substring that matched.
        matched: &'static str,
    },

    /// Device has no capability spec; nothing can be guaranteed.
    #[error("device {device_id} has no capability spec")]
    NoCapabilities {
        /// Targeted device id.
        device_id: String,
    },

    /// Command is not in the device's supported set.
    #[error("device {device_id} does not support command {command:?}")]
    UnsupportedCommand {
        /// Targeted device id.
        device_id: String,
        /// The rejected command.
        command: String,
    },

    /// A range-checked parameter got a non-numeric value.
    #[error("parameter {param} value {value} is not numeric")]
    NonNumericValue {
        /// Parameter name.
        param: String,
        /// The rejected value.
        value: Value,
    },

    /// A numeric parameter is outside its inclusive range.
    #[error("parameter {param}={value} outside range [{min}, {max}]")]
    OutOfRange {
        /// Parameter name.
        param: String,
        /// Supplied value.
        value: f64,
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },

    /// An enum parameter got a value outside the allowed set.
    #[error("parameter {param} value {value} not in allowed set")]
    NotInEnum {
        /// Parameter name.
        param: String,
        /// Supplied value.
        value: Value,
    },

    /// A format parameter does not match its token.
    #[error("parameter {param} value {value:?} does not match format {token}")]
    BadFormat {
        /// Parameter name.
        param: String,
        /// Stringified supplied value.
        value: String,
        /// Expected format token.
        token: &'static str,
    },
}

/// Check an action against the device set, returning the failing clause.
///
/// Pure: no state, no side effects. Use [`is_action_safe`] at the pipeline
/// boundary where only the verdict matters and logging is wanted.
pub fn check_action(
    action: &ActionCommand,
    devices: &[DeviceState],
) -> Result<(), PolicyViolation> {
    let device = devices
        .iter()
        .find(|d| d.id == action.device_id)
        .ok_or_else(|| PolicyViolation::UnknownDevice {
            device_id: action.device_id.clone(),
        })?;

    // Blacklist is substring-based against the id, by design absolute.
    for protected in PROTECTED_DEVICE_SUBSTRINGS {
        if action.device_id.contains(protected) {
            return Err(PolicyViolation::ProtectedDevice {
                device_id: action.device_id.clone(),
                matched: protected,
            });
        }
    }

    let caps = &device.capabilities;
    if caps.is_empty() {
        return Err(PolicyViolation::NoCapabilities {
            device_id: device.id.clone(),
        });
    }

    if !caps.supports_command(&action.command) {
        return Err(PolicyViolation::UnsupportedCommand {
            device_id: device.id.clone(),
            command: action.command.clone(),
        });
    }

    for (param, value) in &action.params {
        let Some(spec) = caps.parameters.get(param) else {
            debug!(
                device_id = %device.id,
                param,
                "parameter not declared in capability spec, skipping bounds check"
            );
            continue;
        };
        check_param(param, value, spec, &device.id)?;
    }

    Ok(())
}

/// Boolean wrapper over [`check_action`] with diagnostics for the failing
/// clause.
pub fn is_action_safe(action: &ActionCommand, devices: &[DeviceState]) -> bool {
    match check_action(action, devices) {
        Ok(()) => true,
        Err(violation) => {
            warn!(
                device_id = %action.device_id,
                command = %action.command,
                %violation,
                "action rejected by policy"
            );
            counter!("aura_policy_rejections").increment(1);
            false
        }
    }
}

/// Check one supplied parameter against its declared spec.
fn check_param(
    param: &str,
    value: &Value,
    spec: &ParamSpec,
    device_id: &str,
) -> Result<(), PolicyViolation> {
    match spec {
        ParamSpec::NumericRange { min, max } => {
            let Some(number) = value.as_f64() else {
                return Err(PolicyViolation::NonNumericValue {
                    param: param.to_string(),
                    value: value.clone(),
                });
            };
            if number < *min || number > *max {
                return Err(PolicyViolation::OutOfRange {
                    param: param.to_string(),
                    value: number,
                    min: *min,
                    max: *max,
                });
            }
            Ok(())
        }
        ParamSpec::StringEnum(allowed) => {
            let matches = value
                .as_str()
                .is_some_and(|v| allowed.iter().any(|a| a == v));
            if matches {
                Ok(())
            } else {
                Err(PolicyViolation::NotInEnum {
                    param: param.to_string(),
                    value: value.clone(),
                })
            }
        }
        ParamSpec::Format(FormatToken::HoursMinutes) => {
            let text = stringify(value);
            if HOURS_MINUTES.is_match(&text) {
                Ok(())
            } else {
                Err(PolicyViolation::BadFormat {
                    param: param.to_string(),
                    value: text,
                    token: FormatToken::HoursMinutes.as_str(),
                })
            }
        }
        ParamSpec::Unsupported(raw) => {
            debug!(
                device_id,
                param,
                spec = %raw,
                "unsupported parameter spec shape, skipping check"
            );
            Ok(())
        }
    }
}

/// Stringify a JSON value the way the format check expects: strings bare,
/// everything else via its JSON rendering.
fn stringify(value: &Value) -> String {
    match value.as_str() {
        Some(s) => s.to_string(),
        None => value.to_string(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
