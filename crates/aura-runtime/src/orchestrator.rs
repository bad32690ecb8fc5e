//! Decision orchestrator — the single stateful coordinator of the pipeline.
//!
//! Stages per call: enrich devices with capability specs → rule candidates →
//! memory retrieval → reasoner pass 1 (summary) → reasoner pass 2
//! (structured suggestion) → policy check → throttle check → final
//! suggestion. Every stage failure is absorbed once into a safe deny; the
//! caller always receives a well-formed [`Suggestion`] and never an error.

use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use serde_json::json;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

use aura_core::{ActivityStatus, CapabilitySpec, ContextPacket, Suggestion};
use aura_llm::{LlmError, Reasoner};
use aura_memory::store::NO_INFORMATION;
use aura_memory::{AddOutcome, MemoryStore};
use aura_policy::{CapabilityMap, is_action_safe};

use crate::rules;
use crate::throttle::{Clock, ProactivityThrottle};

/// Pass-1 fallback when the reasoner cannot produce a summary. Pass 2 still
/// runs; at worst it yields a low-quality deny.
const SUMMARY_ERROR_MARKER: &str = "reasoner pass 1 error";

/// Deny reason when pass-2 output fails the suggestion schema.
const REASON_VALIDATION_FAILED: &str = "suggestion_validation_failed";

/// Deny reason when the pass-2 call itself fails or times out.
const REASON_REASONER_ERROR: &str = "reasoner_error";

/// Suppression reason when the policy validator rejects the action.
const REASON_SAFETY: &str = "Action failed safety check.";

/// Suppression reason when the cooldown is still active.
const REASON_THROTTLED: &str = "Proactivity budget exhausted.";

/// Fallback memory query when no context facet is present.
const GENERIC_MEMORY_QUERY: &str = "general user preferences";

/// Tunables for one orchestrator instance.
#[derive(Clone, Debug)]
pub struct OrchestratorConfig {
    /// Minimum time between surfaced suggestions. Zero disables throttling.
    pub cooldown: Duration,
    /// Maximum facts retrieved per memory query.
    pub memory_results: usize,
    /// Deadline for each reasoner call; a timeout counts as a call failure.
    pub reasoner_timeout: Duration,
    /// Deadline for each memory call.
    pub memory_timeout: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            cooldown: Duration::from_secs(10 * 60),
            memory_results: 3,
            reasoner_timeout: Duration::from_secs(30),
            memory_timeout: Duration::from_secs(10),
        }
    }
}

/// Composes the rule engine, reasoner, policy validator, and throttle into
/// one arbitration pipeline.
///
/// The capability map is loaded at startup and injected here, read-only for
/// the life of the process; the throttle's last-allowed timestamp is the
/// only state surviving across calls.
pub struct DecisionOrchestrator {
    reasoner: Arc<dyn Reasoner>,
    memory: Arc<dyn MemoryStore>,
    capabilities: CapabilityMap,
    throttle: ProactivityThrottle,
    config: OrchestratorConfig,
}

impl std::fmt::Debug for DecisionOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecisionOrchestrator")
            .field("devices", &self.capabilities.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl DecisionOrchestrator {
    /// Create an orchestrator on the system clock.
    pub fn new(
        reasoner: Arc<dyn Reasoner>,
        memory: Arc<dyn MemoryStore>,
        capabilities: CapabilityMap,
        config: OrchestratorConfig,
    ) -> Self {
        let throttle = ProactivityThrottle::new(config.cooldown);
        Self {
            reasoner,
            memory,
            capabilities,
            throttle,
            config,
        }
    }

    /// Create an orchestrator with an injected throttle clock (tests).
    pub fn with_clock(
        reasoner: Arc<dyn Reasoner>,
        memory: Arc<dyn MemoryStore>,
        capabilities: CapabilityMap,
        config: OrchestratorConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let throttle = ProactivityThrottle::with_clock(config.cooldown, clock);
        Self {
            reasoner,
            memory,
            capabilities,
            throttle,
            config,
        }
    }

    /// Run the full arbitration pipeline over one context packet.
    #[instrument(skip_all, fields(timestamp = %ctx.timestamp))]
    pub async fn process_context(&self, mut ctx: ContextPacket) -> Suggestion {
        self.enrich_with_capabilities(&mut ctx);

        let candidates = rules::candidates_from_context(&ctx);
        debug!(count = candidates.len(), "rule candidates generated");

        let query = memory_query(&ctx);
        let memory_text = match timeout(
            self.config.memory_timeout,
            self.memory.get_relevant_info(&query, self.config.memory_results),
        )
        .await
        {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                warn!(error = %e, "memory read failed, proceeding without facts");
                NO_INFORMATION.to_string()
            }
            Err(_) => {
                warn!("memory read timed out, proceeding without facts");
                NO_INFORMATION.to_string()
            }
        };

        let summary = match timeout(
            self.config.reasoner_timeout,
            self.reasoner.summarize(&ctx, &candidates, &memory_text),
        )
        .await
        {
            Ok(Ok(summary)) => summary,
            Ok(Err(e)) => {
                warn!(error = %e, "reasoner pass 1 failed");
                SUMMARY_ERROR_MARKER.to_string()
            }
            Err(_) => {
                warn!("reasoner pass 1 timed out");
                SUMMARY_ERROR_MARKER.to_string()
            }
        };

        let mut suggestion = match timeout(
            self.config.reasoner_timeout,
            self.reasoner.structure(&ctx, &summary),
        )
        .await
        {
            Ok(Ok(suggestion)) => suggestion,
            Ok(Err(LlmError::Schema(e))) => {
                warn!(error = %e, "reasoner pass 2 output failed validation");
                counter!("aura_suggestions_suppressed", "cause" => "validation").increment(1);
                Suggestion::deny(REASON_VALIDATION_FAILED)
            }
            Ok(Err(e)) => {
                warn!(error = %e, "reasoner pass 2 call failed");
                counter!("aura_suggestions_suppressed", "cause" => "reasoner").increment(1);
                Suggestion::deny(REASON_REASONER_ERROR)
            }
            Err(_) => {
                warn!("reasoner pass 2 timed out");
                counter!("aura_suggestions_suppressed", "cause" => "reasoner").increment(1);
                Suggestion::deny(REASON_REASONER_ERROR)
            }
        };

        if let Some(action) = &suggestion.action
            && !is_action_safe(action, &ctx.devices)
        {
            warn!(device_id = %action.device_id, "suggestion suppressed by safety check");
            counter!("aura_suggestions_suppressed", "cause" => "safety").increment(1);
            suggestion.suppress(REASON_SAFETY);
        }

        if suggestion.should_suggest && !self.throttle.allow() {
            info!("suggestion suppressed by proactivity throttle");
            counter!("aura_suggestions_suppressed", "cause" => "cooldown").increment(1);
            suggestion.suppress(REASON_THROTTLED);
        }

        if suggestion.should_suggest {
            counter!("aura_suggestions_allowed").increment(1);
        }
        suggestion
    }

    /// Record an accepted/rejected outcome into memory, best-effort.
    ///
    /// Accepted outcomes are only worth remembering when the suggestion
    /// carried an action; rejections are always recorded with their reason.
    #[instrument(skip_all, fields(accepted))]
    pub async fn record_feedback(
        &self,
        suggestion: &Suggestion,
        ctx: &ContextPacket,
        accepted: bool,
    ) {
        let activity = ctx
            .biometric
            .as_ref()
            .and_then(|b| b.activity_status)
            .map_or("unknown", ActivityStatus::as_str);
        let shown_text = suggestion.suggestion_text.as_deref().unwrap_or("");

        let (text, metadata) = if accepted {
            let Some(action) = &suggestion.action else {
                debug!("accepted suggestion carried no action, nothing to record");
                return;
            };
            (
                format!(
                    "User ACCEPTED this action: {shown_text} (Action: {} {})",
                    action.command, action.device_id
                ),
                json!({
                    "type": "accepted_action",
                    "accepted": true,
                    "action": action,
                    "context_activity": activity,
                }),
            )
        } else {
            (
                format!("User REJECTED this suggestion: {shown_text}"),
                json!({
                    "type": "rejected_action",
                    "accepted": false,
                    "reason": suggestion.reason,
                    "context_activity": activity,
                }),
            )
        };

        match timeout(
            self.config.memory_timeout,
            self.memory.add_document(&text, metadata),
        )
        .await
        {
            Ok(Ok(AddOutcome::Stored(id))) => debug!(id = %id, "feedback fact stored"),
            Ok(Ok(AddOutcome::DuplicateSkipped)) => debug!("feedback fact was a duplicate"),
            Ok(Err(e)) => warn!(error = %e, "feedback write failed"),
            Err(_) => warn!("feedback write timed out"),
        }
    }

    /// Attach capability specs to the packet's devices from the startup map.
    /// Devices absent from the map get the empty spec, which the validator
    /// treats as "no checkable guarantee".
    fn enrich_with_capabilities(&self, ctx: &mut ContextPacket) {
        for device in &mut ctx.devices {
            match self.capabilities.get(&device.id) {
                Some(spec) => device.capabilities = spec.clone(),
                None => {
                    warn!(device_id = %device.id, "device has no capability config entry");
                    device.capabilities = CapabilitySpec::default();
                }
            }
        }
    }
}

/// Build the memory retrieval query from the present context facets.
#[must_use]
pub fn memory_query(ctx: &ContextPacket) -> String {
    let mut parts = Vec::new();
    if let Some(bio) = &ctx.biometric {
        if let Some(activity) = bio.activity_status {
            parts.push(format!("user activity {}", activity.as_str()));
        }
        if let Some(stress) = bio.stress_level {
            parts.push(format!("user stress {}", stress.as_str()));
        }
    }
    if let Some(occupancy) = ctx.environment.as_ref().and_then(|e| e.occupancy) {
        parts.push(format!("room {}", occupancy.as_str()));
    }
    if let Some(place) = ctx.location.as_ref().and_then(|l| l.place.as_deref()) {
        parts.push(format!("user at {place}"));
    }

    if parts.is_empty() {
        GENERIC_MEMORY_QUERY.to_string()
    } else {
        parts.join(", ")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
