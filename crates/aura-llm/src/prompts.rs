//! Prompt templates for the two reasoning passes.

use aura_core::{CandidateAction, ContextPacket};

/// Build the pass-1 prompt: situation summary from context, candidates and
/// retrieved memory.
#[must_use]
pub fn summary_prompt(ctx: &ContextPacket, candidates: &[CandidateAction], memory: &str) -> String {
    let context_json = serde_json::to_string(ctx).unwrap_or_else(|_| "{}".to_string());
    let candidates_json =
        serde_json::to_string(candidates).unwrap_or_else(|_| "[]".to_string());
    format!(
        "You are Aura, a proactive assistant. Given the context, candidate actions, \
         and relevant memories, write a concise summary (2-4 sentences) describing \
         the situation and identify the most relevant candidate action.\n\n\
         Context:\n{context_json}\n\n\
         Candidate Actions:\n{candidates_json}\n\n\
         Relevant Memories:\n{memory}\n\n\
         Concise Summary:"
    )
}

/// Build the pass-2 prompt: structured suggestion from the pass-1 summary.
///
/// The schema instructions demand a bare JSON object; anything else the
/// model wraps around it (code fences in particular) is stripped before
/// parsing.
#[must_use]
pub fn structure_prompt(ctx: &ContextPacket, summary: &str) -> String {
    let context_json = serde_json::to_string(ctx).unwrap_or_else(|_| "{}".to_string());
    format!(
        "You are Aura. Based on the summary of the situation, produce a JSON object \
         that matches the suggestion schema exactly. Your response MUST be only the \
         JSON object.\n\n\
         Summary:\n{summary}\n\n\
         Full Context (for reference):\n{context_json}\n\n\
         JSON Output (must conform to schema):\n\
         {{\"should_suggest\": bool, \"suggestion_text\": string|null, \
         \"reason\": string|null, \
         \"action\": {{\"device_id\": string, \"command\": string, \
         \"params\": object}}|null, \"confidence\": number}}\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn summary_prompt_embeds_all_sections() {
        let ctx = ContextPacket::new(Utc::now());
        let candidates = vec![CandidateAction {
            action_type: "relaxation_routine".into(),
            target_devices: vec!["smart_light_1".into()],
            reason: "user shows high stress".into(),
        }];
        let prompt = summary_prompt(&ctx, &candidates, "- user likes soft lighting");
        assert!(prompt.contains("relaxation_routine"));
        assert!(prompt.contains("soft lighting"));
        assert!(prompt.contains("Concise Summary:"));
    }

    #[test]
    fn structure_prompt_demands_bare_json() {
        let ctx = ContextPacket::new(Utc::now());
        let prompt = structure_prompt(&ctx, "The room is empty with lights on.");
        assert!(prompt.contains("only the JSON object"));
        assert!(prompt.contains("should_suggest"));
        assert!(prompt.contains("The room is empty"));
    }
}
