//! # aura-policy
//!
//! Capability-based safety gate between reasoner-proposed device actions and
//! physical actuation.
//!
//! - **Loader**: [`loader::load_capability_map`] reads the devices.json
//!   capability configuration once at startup; failure is fatal
//! - **Validator**: [`validator::check_action`] / [`validator::is_action_safe`]
//!   evaluate the ordered fail-fast policy clauses (device existence,
//!   protected-device blacklist, capability presence, command whitelist,
//!   parameter bounds)
//!
//! The validator is pure: no state, no side effects beyond diagnostics.
//!
//! ## Crate Position
//!
//! Depends on: aura-core. Depended on by: aura-runtime, aura-agent.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod validator;

pub use errors::PolicyError;
pub use loader::{CapabilityMap, load_capability_map, parse_capability_config};
pub use validator::{PolicyViolation, check_action, is_action_safe};
