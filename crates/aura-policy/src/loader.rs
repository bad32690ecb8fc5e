//! Startup loader for the device capability configuration.
//!
//! Wire format:
//!
//! ```json
//! {
//!   "devices": [
//!     {
//!       "id": "smart_ac_1",
//!       "functions": ["set_mode", "set_temperature"],
//!       "parameters": { "mode": ["cool", "heat"], "temperature": [16, 30] }
//!     }
//!   ]
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use aura_core::CapabilitySpec;

use crate::errors::PolicyError;

/// Process-wide device id → capability spec map, read-only after startup.
pub type CapabilityMap = HashMap<String, CapabilitySpec>;

/// One device descriptor in the capability file.
#[derive(Debug, Deserialize)]
struct DeviceDescriptor {
    id: String,
    #[serde(flatten)]
    spec: CapabilitySpec,
}

/// Root shape of the capability file.
#[derive(Debug, Deserialize)]
struct CapabilityConfig {
    #[serde(default)]
    devices: Vec<DeviceDescriptor>,
}

/// Load the capability configuration from a file.
///
/// Any failure here is fatal to startup — the policy validator cannot give
/// guarantees without the map.
pub fn load_capability_map(path: &Path) -> Result<CapabilityMap, PolicyError> {
    let text = std::fs::read_to_string(path).map_err(|e| PolicyError::Read {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let map = parse_capability_config(&text).map_err(|e| match e {
        PolicyError::Parse { reason, .. } => PolicyError::Parse {
            path: path.display().to_string(),
            reason,
        },
        other => other,
    })?;
    info!(path = %path.display(), devices = map.len(), "capability config loaded");
    Ok(map)
}

/// Parse capability configuration JSON into a [`CapabilityMap`].
///
/// Duplicate device ids are rejected: a silently-last-wins merge could drop
/// the spec an operator thought was active.
pub fn parse_capability_config(text: &str) -> Result<CapabilityMap, PolicyError> {
    let config: CapabilityConfig =
        serde_json::from_str(text).map_err(|e| PolicyError::Parse {
            path: String::new(),
            reason: e.to_string(),
        })?;

    let mut map = CapabilityMap::with_capacity(config.devices.len());
    for descriptor in config.devices {
        if map.contains_key(&descriptor.id) {
            return Err(PolicyError::DuplicateDevice(descriptor.id));
        }
        let _ = map.insert(descriptor.id, descriptor.spec);
    }
    Ok(map)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
