//! Context snapshot types — the data driving one decision cycle.
//!
//! A [`ContextPacket`] is request-scoped: created per orchestration call,
//! never shared across calls. All sub-records are optional; a packet with
//! only a timestamp is valid.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::capability::CapabilitySpec;
use crate::errors::ContextError;

// ─────────────────────────────────────────────────────────────────────────────
// Sub-record enums
// ─────────────────────────────────────────────────────────────────────────────

/// User activity classification from wearable telemetry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityStatus {
    /// No significant movement.
    Idle,
    /// Walking.
    Walking,
    /// Recently finished a workout.
    PostWorkout,
}

impl ActivityStatus {
    /// The snake_case wire form, used in memory queries and stored facts.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Walking => "walking",
            Self::PostWorkout => "post_workout",
        }
    }
}

/// Coarse stress classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StressLevel {
    /// Baseline stress.
    Low,
    /// Elevated stress.
    High,
}

impl StressLevel {
    /// The snake_case wire form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::High => "high",
        }
    }
}

/// Air quality bucket reported by environment sensors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AirQuality {
    /// Good.
    Good,
    /// Moderate.
    Moderate,
    /// Poor.
    Poor,
}

/// Room occupancy state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occupancy {
    /// Someone is in the room.
    Occupied,
    /// The room is empty.
    Vacant,
}

impl Occupancy {
    /// The snake_case wire form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Occupied => "occupied",
            Self::Vacant => "vacant",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sub-records
// ─────────────────────────────────────────────────────────────────────────────

fn default_confidence() -> Option<f64> {
    Some(1.0)
}

/// Biometric snapshot from wearables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BiometricContext {
    /// Heart rate in BPM.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<f64>,
    /// Activity classification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_status: Option<ActivityStatus>,
    /// Stress classification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stress_level: Option<StressLevel>,
    /// Calories burned today.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories_today: Option<f64>,
    /// Sensor confidence in [0, 1].
    #[serde(default = "default_confidence")]
    pub confidence: Option<f64>,
}

/// Location snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LocationContext {
    /// Named place ("home", "office", ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
    /// Estimated travel time to the next destination, in minutes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel_eta_min: Option<i64>,
    /// Sensor confidence in [0, 1].
    #[serde(default = "default_confidence")]
    pub confidence: Option<f64>,
}

/// Calendar snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScheduleContext {
    /// Start time of the next meeting, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_meeting_time: Option<DateTime<Utc>>,
    /// Whether the user is free right now.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_now: Option<bool>,
}

/// Room environment snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EnvironmentContext {
    /// Room temperature in degrees Celsius.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_temp: Option<f64>,
    /// Air quality bucket.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub air_quality: Option<AirQuality>,
    /// Occupancy state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupancy: Option<Occupancy>,
    /// Occupancy detection confidence in [0, 1].
    #[serde(default = "default_confidence")]
    pub occupancy_confidence: Option<f64>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Device state
// ─────────────────────────────────────────────────────────────────────────────

/// Current state of one smart device.
///
/// `capabilities` is empty as delivered by the telemetry layer; the
/// orchestrator populates it from the startup-loaded capability map before
/// any policy check runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeviceState {
    /// Unique device id within one packet.
    pub id: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Whether the device is powered on.
    pub on: bool,
    /// Current parameter values (brightness, temperature, ...).
    #[serde(default)]
    pub params: serde_json::Map<String, Value>,
    /// Declarative capability spec, attached by the orchestrator.
    #[serde(default)]
    pub capabilities: CapabilitySpec,
}

impl DeviceState {
    /// Create a device state with no params and an empty capability spec.
    #[must_use]
    pub fn new(id: impl Into<String>, on: bool) -> Self {
        Self {
            id: id.into(),
            name: None,
            on,
            params: serde_json::Map::new(),
            capabilities: CapabilitySpec::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Context packet
// ─────────────────────────────────────────────────────────────────────────────

/// Structured snapshot of user and environment state driving one decision
/// cycle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContextPacket {
    /// Snapshot time.
    pub timestamp: DateTime<Utc>,
    /// Biometric sub-record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biometric: Option<BiometricContext>,
    /// Location sub-record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationContext>,
    /// Schedule sub-record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<ScheduleContext>,
    /// Environment sub-record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<EnvironmentContext>,
    /// Device states; order is irrelevant.
    #[serde(default)]
    pub devices: Vec<DeviceState>,
    /// Free-form auxiliary data, carried opaque.
    #[serde(default)]
    pub raw: serde_json::Map<String, Value>,
}

impl ContextPacket {
    /// Create an empty packet at the given timestamp.
    #[must_use]
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            biometric: None,
            location: None,
            schedule: None,
            environment: None,
            devices: Vec::new(),
            raw: serde_json::Map::new(),
        }
    }

    /// Check packet invariants: device ids unique, confidence fields in [0, 1].
    pub fn validate(&self) -> Result<(), ContextError> {
        let mut seen = std::collections::HashSet::new();
        for dev in &self.devices {
            if !seen.insert(dev.id.as_str()) {
                return Err(ContextError::DuplicateDeviceId(dev.id.clone()));
            }
        }
        let confidences = [
            ("biometric.confidence", self.biometric.as_ref().and_then(|b| b.confidence)),
            ("location.confidence", self.location.as_ref().and_then(|l| l.confidence)),
            (
                "environment.occupancy_confidence",
                self.environment.as_ref().and_then(|e| e.occupancy_confidence),
            ),
        ];
        for (field, value) in confidences {
            if let Some(v) = value
                && !(0.0..=1.0).contains(&v)
            {
                return Err(ContextError::ConfidenceOutOfRange { field, value: v });
            }
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn minimal_packet_deserializes() {
        let packet: ContextPacket =
            serde_json::from_value(json!({"timestamp": "2026-08-01T10:00:00Z"})).unwrap();
        assert!(packet.biometric.is_none());
        assert!(packet.devices.is_empty());
        assert!(packet.validate().is_ok());
    }

    #[test]
    fn sub_record_enums_use_snake_case() {
        let bio: BiometricContext = serde_json::from_value(json!({
            "heart_rate": 115.0,
            "activity_status": "post_workout",
            "stress_level": "high"
        }))
        .unwrap();
        assert_eq!(bio.activity_status, Some(ActivityStatus::PostWorkout));
        assert_eq!(bio.stress_level, Some(StressLevel::High));
        // confidence defaults to 1.0 when omitted
        assert_eq!(bio.confidence, Some(1.0));
    }

    #[test]
    fn device_state_defaults_to_empty_capabilities() {
        let dev: DeviceState =
            serde_json::from_value(json!({"id": "smart_light_1", "on": true})).unwrap();
        assert!(dev.capabilities.is_empty());
        assert!(dev.params.is_empty());
    }

    #[test]
    fn validate_rejects_duplicate_device_ids() {
        let mut packet = ContextPacket::new(Utc::now());
        packet.devices.push(DeviceState::new("smart_light_1", true));
        packet.devices.push(DeviceState::new("smart_light_1", false));
        let err = packet.validate().unwrap_err();
        assert!(err.to_string().contains("smart_light_1"));
    }

    #[test]
    fn validate_rejects_out_of_range_confidence() {
        let mut packet = ContextPacket::new(Utc::now());
        packet.biometric = Some(BiometricContext {
            confidence: Some(1.5),
            ..BiometricContext::default()
        });
        assert!(packet.validate().is_err());
    }

    #[test]
    fn packet_serde_roundtrip() {
        let mut packet = ContextPacket::new(Utc::now());
        packet.environment = Some(EnvironmentContext {
            room_temp: Some(37.0),
            air_quality: Some(AirQuality::Moderate),
            occupancy: Some(Occupancy::Vacant),
            occupancy_confidence: Some(0.9),
        });
        packet.devices.push(DeviceState::new("smart_ac_1", false));
        let json = serde_json::to_string(&packet).unwrap();
        let back: ContextPacket = serde_json::from_str(&json).unwrap();
        assert_eq!(packet, back);
    }
}
