//! Settings type definitions.
//!
//! Every section implements [`Default`] with production default values and
//! carries `#[serde(default)]` so a partial JSON file works — missing
//! fields get their default during deserialization.

use serde::{Deserialize, Serialize};

/// Root settings for the Aura decision core.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AuraSettings {
    /// External reasoning service.
    pub reasoner: ReasonerSettings,
    /// Memory collaborator knobs.
    pub memory: MemorySettings,
    /// Suggestion rate limiting.
    pub throttle: ThrottleSettings,
    /// Device capability configuration.
    pub devices: DeviceSettings,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

/// Reasoning-service connection settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReasonerSettings {
    /// Base URL of the chat-completions endpoint.
    pub base_url: String,
    /// Model identifier sent with each request.
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    /// Per-call timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ReasonerSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434/v1".to_string(),
            model: "gemini-2.0-flash".to_string(),
            api_key_env: "AURA_API_KEY".to_string(),
            timeout_ms: 30_000,
        }
    }
}

/// Memory-store knobs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemorySettings {
    /// Maximum facts retrieved per query.
    pub n_results: usize,
    /// Cosine-similarity threshold above which a new fact is a duplicate.
    pub similarity_threshold: f64,
    /// Per-call timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for MemorySettings {
    fn default() -> Self {
        Self {
            n_results: 3,
            similarity_threshold: 0.85,
            timeout_ms: 10_000,
        }
    }
}

/// Suggestion cooldown settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrottleSettings {
    /// Minutes between allowed suggestions. Zero disables throttling.
    pub cooldown_minutes: u64,
}

impl Default for ThrottleSettings {
    fn default() -> Self {
        Self { cooldown_minutes: 10 }
    }
}

/// Device capability configuration location.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceSettings {
    /// Path to the capability configuration JSON.
    pub capabilities_path: String,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            capabilities_path: "devices.json".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default tracing filter when `AURA_LOG` is unset.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_production_values() {
        let settings = AuraSettings::default();
        assert_eq!(settings.throttle.cooldown_minutes, 10);
        assert_eq!(settings.memory.n_results, 3);
        assert!((settings.memory.similarity_threshold - 0.85).abs() < f64::EPSILON);
        assert_eq!(settings.devices.capabilities_path, "devices.json");
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let settings: AuraSettings =
            serde_json::from_str(r#"{"throttle": {"cooldown_minutes": 0}}"#).unwrap();
        assert_eq!(settings.throttle.cooldown_minutes, 0);
        assert_eq!(settings.memory.n_results, 3);
    }
}
