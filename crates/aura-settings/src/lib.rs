//! # aura-settings
//!
//! Operator configuration for the Aura decision core.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults** — [`AuraSettings::default()`]
//! 2. **Settings file** — JSON, deep-merged over defaults
//! 3. **Environment variables** — `AURA_*` overrides (highest priority)
//!
//! A missing settings file is not an error (defaults apply); a present but
//! malformed file is, so a typo'd config never silently degrades to
//! defaults. Loaded settings are injected into the orchestrator as an
//! immutable value — there is no global singleton.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::SettingsError;
pub use loader::{deep_merge, load_settings_from_path};
pub use types::*;
