//! Device capability specs — what commands a device supports and which
//! parameter values are valid.
//!
//! Specs are loaded once from the capability configuration at startup and
//! are immutable for the life of the process. The wire format is the raw
//! devices.json shape: a numeric range is `[min, max]`, an enum is a list
//! of strings, a format is a bare token string (currently only `"HH:MM"`).
//! Anything else deserializes as [`ParamSpec::Unsupported`] and is skipped
//! by the policy validator rather than rejected.

use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Recognized format tokens for string-shaped parameter specs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatToken {
    /// Two-digit hours, colon, two-digit minutes (`"07:30"`).
    HoursMinutes,
}

impl FormatToken {
    /// The wire token for this format.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HoursMinutes => "HH:MM",
        }
    }
}

/// One parameter's validity spec, dispatched on by the policy validator.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamSpec {
    /// Inclusive numeric range `[min, max]`.
    NumericRange {
        /// Lower bound, inclusive.
        min: f64,
        /// Upper bound, inclusive.
        max: f64,
    },
    /// Closed set of allowed string values.
    StringEnum(Vec<String>),
    /// Value must match a known format token.
    Format(FormatToken),
    /// Shape the validator does not understand; checks are skipped.
    Unsupported(Value),
}

impl Serialize for ParamSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::NumericRange { min, max } => [min, max].serialize(serializer),
            Self::StringEnum(values) => values.serialize(serializer),
            Self::Format(token) => token.as_str().serialize(serializer),
            Self::Unsupported(raw) => raw.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for ParamSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(Self::from_value(raw))
    }
}

impl ParamSpec {
    /// Classify a raw JSON value into a spec variant.
    ///
    /// Unclassifiable shapes (empty lists, mixed-type lists, numeric lists
    /// that are not a pair, unrecognized strings, objects) become
    /// [`ParamSpec::Unsupported`] — never an error, so one odd entry in the
    /// capability file cannot poison loading.
    #[must_use]
    pub fn from_value(raw: Value) -> Self {
        match &raw {
            Value::Array(items) if !items.is_empty() => {
                if items.iter().all(Value::is_number) {
                    if let [min, max] = items.as_slice() {
                        return Self::NumericRange {
                            min: min.as_f64().unwrap_or(f64::NAN),
                            max: max.as_f64().unwrap_or(f64::NAN),
                        };
                    }
                } else if items.iter().all(Value::is_string) {
                    let values = items
                        .iter()
                        .filter_map(Value::as_str)
                        .map(String::from)
                        .collect();
                    return Self::StringEnum(values);
                }
                Self::Unsupported(raw)
            }
            Value::String(s) if s == FormatToken::HoursMinutes.as_str() => {
                Self::Format(FormatToken::HoursMinutes)
            }
            _ => Self::Unsupported(raw),
        }
    }
}

/// Declarative capability spec for one device: supported command names and
/// per-parameter validity specs.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapabilitySpec {
    /// Command names the device supports.
    pub functions: Vec<String>,
    /// Parameter name → validity spec.
    pub parameters: BTreeMap<String, ParamSpec>,
}

impl CapabilitySpec {
    /// True when no commands and no parameters are declared.
    ///
    /// An empty spec means "no checkable guarantee" — the policy validator
    /// fails safe on it.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty() && self.parameters.is_empty()
    }

    /// Whether the given command is in the supported set.
    #[must_use]
    pub fn supports_command(&self, command: &str) -> bool {
        self.functions.iter().any(|f| f == command)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec_of(value: Value) -> ParamSpec {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn numeric_pair_is_a_range() {
        assert_eq!(
            spec_of(json!([0, 100])),
            ParamSpec::NumericRange { min: 0.0, max: 100.0 }
        );
    }

    #[test]
    fn string_list_is_an_enum() {
        assert_eq!(
            spec_of(json!(["cool", "heat", "dry", "fan"])),
            ParamSpec::StringEnum(vec![
                "cool".into(),
                "heat".into(),
                "dry".into(),
                "fan".into()
            ])
        );
    }

    #[test]
    fn hh_mm_token_is_a_format() {
        assert_eq!(spec_of(json!("HH:MM")), ParamSpec::Format(FormatToken::HoursMinutes));
    }

    #[test]
    fn odd_shapes_are_unsupported() {
        assert!(matches!(spec_of(json!([])), ParamSpec::Unsupported(_)));
        assert!(matches!(spec_of(json!([1, 2, 3])), ParamSpec::Unsupported(_)));
        assert!(matches!(spec_of(json!([1, "mixed"])), ParamSpec::Unsupported(_)));
        assert!(matches!(spec_of(json!("YYYY-MM-DD")), ParamSpec::Unsupported(_)));
        assert!(matches!(spec_of(json!({"nested": true})), ParamSpec::Unsupported(_)));
    }

    #[test]
    fn capability_spec_parses_devices_json_shape() {
        let spec: CapabilitySpec = serde_json::from_value(json!({
            "functions": ["set_mode", "set_temperature", "schedule"],
            "parameters": {
                "mode": ["cool", "heat"],
                "temperature": [16, 30],
                "schedule_time": "HH:MM"
            }
        }))
        .unwrap();
        assert!(spec.supports_command("set_temperature"));
        assert!(!spec.supports_command("explode"));
        assert_eq!(
            spec.parameters["temperature"],
            ParamSpec::NumericRange { min: 16.0, max: 30.0 }
        );
        assert_eq!(
            spec.parameters["schedule_time"],
            ParamSpec::Format(FormatToken::HoursMinutes)
        );
    }

    #[test]
    fn serialize_round_trips_wire_shapes() {
        let spec = CapabilitySpec {
            functions: vec!["set_brightness".into()],
            parameters: [("brightness".to_string(), ParamSpec::NumericRange { min: 0.0, max: 100.0 })]
                .into_iter()
                .collect(),
        };
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["parameters"]["brightness"], json!([0.0, 100.0]));
        let back: CapabilitySpec = serde_json::from_value(json).unwrap();
        assert_eq!(spec, back);
    }

    #[test]
    fn empty_spec_is_empty() {
        assert!(CapabilitySpec::default().is_empty());
    }
}
