//! # aura-llm
//!
//! External reasoning service abstraction for the Aura decision core.
//!
//! The reasoner runs two strictly sequential passes per decision cycle:
//!
//! - **Pass 1** — [`Reasoner::summarize`]: context + rule candidates +
//!   retrieved memory → a 2-4 sentence free-text situation summary
//! - **Pass 2** — [`Reasoner::structure`]: context + summary → a
//!   [`aura_core::Suggestion`]-shaped structured output
//!
//! Failures surface as typed [`LlmError`] values; the orchestrator absorbs
//! them into safe deny outcomes, never retries.
//!
//! ## Crate Position
//!
//! Depends on: aura-core. Depended on by: aura-runtime, aura-agent.

#![deny(unsafe_code)]

pub mod errors;
pub mod http;
pub mod prompts;
pub mod reasoner;
pub mod scripted;

pub use errors::LlmError;
pub use http::{HttpReasoner, HttpReasonerConfig};
pub use reasoner::Reasoner;
pub use scripted::ScriptedReasoner;
