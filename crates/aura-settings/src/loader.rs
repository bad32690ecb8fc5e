//! Layered settings loading: defaults ← file ← environment.

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::errors::SettingsError;
use crate::types::AuraSettings;

/// Deep-merge `overlay` into `base`.
///
/// Objects merge recursively; any other value in `overlay` replaces the
/// value in `base`.
#[must_use]
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => overlay_value,
                };
                let _ = base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        (_, overlay) => overlay,
    }
}

/// Load settings from a JSON file, deep-merged over compiled defaults, then
/// apply `AURA_*` environment overrides.
///
/// A missing file is not an error; a file that exists but cannot be read or
/// parsed is.
pub fn load_settings_from_path(path: &Path) -> Result<AuraSettings, SettingsError> {
    let mut settings = if path.exists() {
        let text = std::fs::read_to_string(path).map_err(|e| SettingsError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let file_value: Value =
            serde_json::from_str(&text).map_err(|e| SettingsError::Parse {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        let defaults = serde_json::to_value(AuraSettings::default())
            .unwrap_or(Value::Object(serde_json::Map::new()));
        let merged = deep_merge(defaults, file_value);
        serde_json::from_value(merged).map_err(|e| SettingsError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?
    } else {
        debug!(path = %path.display(), "settings file not found, using defaults");
        AuraSettings::default()
    };

    apply_env_overrides(&mut settings)?;
    Ok(settings)
}

/// Apply `AURA_*` environment variable overrides in place.
fn apply_env_overrides(settings: &mut AuraSettings) -> Result<(), SettingsError> {
    apply_overrides(settings, |name| {
        std::env::var(name).ok().filter(|v| !v.is_empty())
    })
}

/// Override application against an arbitrary variable source, so tests can
/// run without mutating the process environment.
fn apply_overrides(
    settings: &mut AuraSettings,
    env_var: impl Fn(&str) -> Option<String>,
) -> Result<(), SettingsError> {
    if let Some(value) = env_var("AURA_COOLDOWN_MINUTES") {
        settings.throttle.cooldown_minutes =
            value.parse().map_err(|_| SettingsError::EnvOverride {
                var: "AURA_COOLDOWN_MINUTES",
                value,
            })?;
    }
    if let Some(value) = env_var("AURA_MEMORY_RESULTS") {
        settings.memory.n_results = value.parse().map_err(|_| SettingsError::EnvOverride {
            var: "AURA_MEMORY_RESULTS",
            value,
        })?;
    }
    if let Some(value) = env_var("AURA_SIMILARITY_THRESHOLD") {
        settings.memory.similarity_threshold =
            value.parse().map_err(|_| SettingsError::EnvOverride {
                var: "AURA_SIMILARITY_THRESHOLD",
                value,
            })?;
    }
    if let Some(value) = env_var("AURA_DEVICES_PATH") {
        settings.devices.capabilities_path = value;
    }
    if let Some(value) = env_var("AURA_REASONER_URL") {
        settings.reasoner.base_url = value;
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
