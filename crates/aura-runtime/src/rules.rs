//! Deterministic rule engine.
//!
//! Pure function from a context packet to an ordered list of candidate
//! actions. Rules are evaluated independently in declaration order and more
//! than one may fire; there is no priority resolution here — downstream
//! reasoning picks at most one. A missing sub-record skips its rule, and a
//! rule whose target list comes up empty emits nothing.

use aura_core::{ActivityStatus, CandidateAction, ContextPacket, Occupancy, StressLevel};

/// Generate candidate actions from a context packet.
///
/// Target device lists are sorted so the output is deterministic regardless
/// of device ordering in the packet.
#[must_use]
pub fn candidates_from_context(ctx: &ContextPacket) -> Vec<CandidateAction> {
    let mut candidates = Vec::new();

    // Vacant room with lights still on.
    if ctx
        .environment
        .as_ref()
        .is_some_and(|env| env.occupancy == Some(Occupancy::Vacant))
    {
        let targets = matching_ids(ctx, |dev| dev.on && dev.id.contains("light"));
        if !targets.is_empty() {
            candidates.push(CandidateAction {
                action_type: "turn_off_room_lights".to_string(),
                target_devices: targets,
                reason: "room appears empty and lights are on".to_string(),
            });
        }
    }

    // Post-workout at home: warm water.
    let post_workout = ctx
        .biometric
        .as_ref()
        .is_some_and(|bio| bio.activity_status == Some(ActivityStatus::PostWorkout));
    let at_home = ctx
        .location
        .as_ref()
        .is_some_and(|loc| loc.place.as_deref() == Some("home"));
    if post_workout && at_home {
        let targets =
            matching_ids(ctx, |dev| dev.id.contains("geyser") || dev.id.contains("water_heater"));
        if !targets.is_empty() {
            candidates.push(CandidateAction {
                action_type: "prepare_bath".to_string(),
                target_devices: targets,
                reason: "user finished workout and is at home".to_string(),
            });
        }
    }

    // High stress: lights and speakers can run a wind-down routine.
    if ctx
        .biometric
        .as_ref()
        .is_some_and(|bio| bio.stress_level == Some(StressLevel::High))
    {
        let targets =
            matching_ids(ctx, |dev| dev.id.contains("light") || dev.id.contains("speaker"));
        if !targets.is_empty() {
            candidates.push(CandidateAction {
                action_type: "relaxation_routine".to_string(),
                target_devices: targets,
                reason: "user shows high stress".to_string(),
            });
        }
    }

    candidates
}

fn matching_ids(
    ctx: &ContextPacket,
    predicate: impl Fn(&aura_core::DeviceState) -> bool,
) -> Vec<String> {
    let mut ids: Vec<String> = ctx
        .devices
        .iter()
        .filter(|d| predicate(d))
        .map(|d| d.id.clone())
        .collect();
    ids.sort_unstable();
    ids
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
