//! # aura-core
//!
//! Foundation types for the Aura decision core.
//!
//! This crate provides the shared vocabulary that all other Aura crates
//! depend on:
//!
//! - **Context**: [`context::ContextPacket`] and its optional sub-records
//!   (biometric, location, schedule, environment) plus [`context::DeviceState`]
//! - **Capabilities**: [`capability::CapabilitySpec`] and the
//!   [`capability::ParamSpec`] sum type describing valid parameter shapes
//! - **Actions**: [`action::CandidateAction`] (rule-derived, ephemeral) and
//!   [`action::ActionCommand`] (reasoner-proposed, policy-checked)
//! - **Suggestions**: [`action::Suggestion`], the pipeline's terminal artifact
//! - **Errors**: [`errors::ContextError`] for packet validation
//! - **Logging**: [`logging::init_tracing`] subscriber setup for binaries
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by all other aura crates.

#![deny(unsafe_code)]

pub mod action;
pub mod capability;
pub mod context;
pub mod errors;
pub mod logging;

pub use action::{ActionCommand, CandidateAction, Suggestion};
pub use capability::{CapabilitySpec, FormatToken, ParamSpec};
pub use context::{
    ActivityStatus, AirQuality, BiometricContext, ContextPacket, DeviceState,
    EnvironmentContext, LocationContext, Occupancy, ScheduleContext, StressLevel,
};
pub use errors::ContextError;
