//! # aura-runtime
//!
//! The arbitration pipeline of the Aura decision core.
//!
//! - **Rule engine**: [`rules::candidates_from_context`] — deterministic
//!   candidate actions from a context packet
//! - **Throttle**: [`throttle::ProactivityThrottle`] — cooldown gate over a
//!   shared last-allowed timestamp, with an injectable clock
//! - **Orchestrator**: [`orchestrator::DecisionOrchestrator`] — enrich →
//!   candidates → memory → reasoner pass 1 → pass 2 → safety check →
//!   throttle → final suggestion, with fallback-to-deny on every failure
//!
//! ## Crate Position
//!
//! Aggregation layer. Depends on: aura-core, aura-policy, aura-llm,
//! aura-memory. Depended on by: aura-agent.

#![deny(unsafe_code)]

pub mod orchestrator;
pub mod rules;
pub mod throttle;

pub use orchestrator::{DecisionOrchestrator, OrchestratorConfig};
pub use throttle::{Clock, ManualClock, ProactivityThrottle, SystemClock};
