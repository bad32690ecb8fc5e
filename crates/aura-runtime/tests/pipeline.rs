//! Full pipeline scenarios: scripted reasoner, real memory store, real
//! policy validator, manual clock.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Value, json};

use aura_core::{ActivityStatus, BiometricContext, ContextPacket, DeviceState, Suggestion};
use aura_llm::ScriptedReasoner;
use aura_memory::{AddOutcome, HashEmbedding, MemoryError, MemoryStore, VectorMemoryStore};
use aura_policy::CapabilityMap;
use aura_runtime::{Clock, DecisionOrchestrator, ManualClock, OrchestratorConfig};

const COOLDOWN: Duration = Duration::from_secs(10 * 60);

fn capability_map() -> CapabilityMap {
    aura_policy::parse_capability_config(
        r#"{"devices": [
            {
                "id": "smart_light_1",
                "functions": ["on", "off", "set_brightness"],
                "parameters": {"brightness": [0, 100]}
            },
            {
                "id": "smart_ac_1",
                "functions": ["on", "off", "set_temperature"],
                "parameters": {"temperature": [16.0, 30.0]}
            }
        ]}"#,
    )
    .unwrap()
}

fn post_workout_context() -> ContextPacket {
    let mut ctx = ContextPacket::new(Utc::now());
    ctx.biometric = Some(BiometricContext {
        activity_status: Some(ActivityStatus::PostWorkout),
        ..BiometricContext::default()
    });
    ctx.devices = vec![
        DeviceState::new("smart_light_1", true),
        DeviceState::new("smart_ac_1", false),
    ];
    ctx
}

fn brightness_suggestion() -> Suggestion {
    serde_json::from_value(json!({
        "should_suggest": true,
        "suggestion_text": "You just finished a workout. Dim the lights to 80%?",
        "action": {
            "device_id": "smart_light_1",
            "command": "set_brightness",
            "params": {"brightness": 80}
        },
        "confidence": 0.9
    }))
    .unwrap()
}

fn orchestrator(
    reasoner: Arc<ScriptedReasoner>,
    clock: Arc<dyn Clock>,
) -> DecisionOrchestrator {
    let memory = Arc::new(VectorMemoryStore::new(Arc::new(HashEmbedding::new(64)), 0.85));
    DecisionOrchestrator::with_clock(
        reasoner,
        memory,
        capability_map(),
        OrchestratorConfig {
            cooldown: COOLDOWN,
            ..OrchestratorConfig::default()
        },
        clock,
    )
}

#[tokio::test]
async fn identical_safe_suggestion_is_throttled_until_cooldown_expires() {
    let reasoner = Arc::new(ScriptedReasoner::new());
    for _ in 0..3 {
        reasoner.push_summary("User finished a workout, living room light is on.");
        reasoner.push_suggestion(brightness_suggestion());
    }

    let clock = ManualClock::new();
    let orch = orchestrator(Arc::clone(&reasoner), Arc::new(clock.clone()));

    let first = orch.process_context(post_workout_context()).await;
    assert!(first.should_suggest);
    assert_eq!(first.action.as_ref().unwrap().command, "set_brightness");

    // same safe suggestion a minute later: swallowed by the cooldown,
    // action kept for auditing
    clock.advance(Duration::from_secs(60));
    let second = orch.process_context(post_workout_context()).await;
    assert!(!second.should_suggest);
    assert_eq!(second.reason.as_deref(), Some("Proactivity budget exhausted."));
    assert!(second.action.is_some());

    clock.advance(COOLDOWN);
    let third = orch.process_context(post_workout_context()).await;
    assert!(third.should_suggest);
}

#[tokio::test]
async fn out_of_range_temperature_is_rejected_even_with_open_budget() {
    let reasoner = Arc::new(ScriptedReasoner::new());
    reasoner.push_summary("Room feels warm, AC is off.");
    reasoner.push_suggestion(
        serde_json::from_value(json!({
            "should_suggest": true,
            "suggestion_text": "Heat the room to 90 degrees?",
            "action": {
                "device_id": "smart_ac_1",
                "command": "set_temperature",
                "params": {"temperature": 90}
            },
            "confidence": 0.8
        }))
        .unwrap(),
    );

    // fresh throttle, nothing spent
    let orch = orchestrator(Arc::clone(&reasoner), Arc::new(ManualClock::new()));
    let out = orch.process_context(post_workout_context()).await;
    assert!(!out.should_suggest);
    assert_eq!(out.reason.as_deref(), Some("Action failed safety check."));
    // reasoner confidence is untouched by suppression
    assert_eq!(out.confidence, Some(0.8));
}

#[tokio::test]
async fn safety_rejection_does_not_consume_the_budget() {
    let reasoner = Arc::new(ScriptedReasoner::new());
    reasoner.push_summary("s1");
    reasoner.push_suggestion(
        serde_json::from_value(json!({
            "should_suggest": true,
            "suggestion_text": "Reboot the router?",
            "action": {"device_id": "router_main", "command": "off", "params": {}},
            "confidence": 0.7
        }))
        .unwrap(),
    );
    reasoner.push_summary("s2");
    reasoner.push_suggestion(brightness_suggestion());

    let orch = orchestrator(Arc::clone(&reasoner), Arc::new(ManualClock::new()));

    let rejected = orch.process_context(post_workout_context()).await;
    assert_eq!(rejected.reason.as_deref(), Some("Action failed safety check."));

    // the rejected cycle never reached the throttle, so the next safe
    // suggestion goes straight through
    let allowed = orch.process_context(post_workout_context()).await;
    assert!(allowed.should_suggest);
}

// ─────────────────────────────────────────────────────────────────────────────
// Memory degradation
// ─────────────────────────────────────────────────────────────────────────────

struct BrokenMemory;

#[async_trait]
impl MemoryStore for BrokenMemory {
    async fn add_document(&self, _text: &str, _metadata: Value) -> Result<AddOutcome, MemoryError> {
        Err(MemoryError::Store("backend offline".into()))
    }

    async fn get_relevant_info(
        &self,
        _query: &str,
        _n_results: usize,
    ) -> Result<String, MemoryError> {
        Err(MemoryError::Store("backend offline".into()))
    }
}

#[tokio::test]
async fn memory_failure_degrades_without_blocking_the_suggestion() {
    let reasoner = Arc::new(ScriptedReasoner::new());
    reasoner.push_summary("summary without memory");
    reasoner.push_suggestion(brightness_suggestion());

    let orch = DecisionOrchestrator::with_clock(
        Arc::<ScriptedReasoner>::clone(&reasoner),
        Arc::new(BrokenMemory),
        capability_map(),
        OrchestratorConfig::default(),
        Arc::new(ManualClock::new()),
    );

    let out = orch.process_context(post_workout_context()).await;
    assert!(out.should_suggest);
}

#[tokio::test]
async fn feedback_write_failure_is_swallowed() {
    let orch = DecisionOrchestrator::with_clock(
        Arc::new(ScriptedReasoner::new()),
        Arc::new(BrokenMemory),
        capability_map(),
        OrchestratorConfig::default(),
        Arc::new(ManualClock::new()),
    );

    let mut suggestion = brightness_suggestion();
    suggestion.suppress("user said no");
    // must not panic or error
    orch.record_feedback(&suggestion, &post_workout_context(), false).await;
}
