//! Deterministic reasoner test double.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use aura_core::{CandidateAction, ContextPacket, Suggestion};

use crate::errors::LlmError;
use crate::reasoner::Reasoner;

/// Reasoner that replays queued responses, for orchestrator tests.
///
/// Each pass pops from its own queue; an empty queue is a typed error, so a
/// test that under-provisions responses fails loudly instead of hanging.
#[derive(Default)]
pub struct ScriptedReasoner {
    summaries: Mutex<VecDeque<Result<String, LlmError>>>,
    suggestions: Mutex<VecDeque<Result<Suggestion, LlmError>>>,
}

impl ScriptedReasoner {
    /// Empty script; every call errors until responses are queued.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a pass-1 summary.
    pub fn push_summary(&self, summary: impl Into<String>) {
        self.summaries.lock().push_back(Ok(summary.into()));
    }

    /// Queue a pass-1 failure.
    pub fn push_summary_error(&self, error: LlmError) {
        self.summaries.lock().push_back(Err(error));
    }

    /// Queue a pass-2 suggestion.
    pub fn push_suggestion(&self, suggestion: Suggestion) {
        self.suggestions.lock().push_back(Ok(suggestion));
    }

    /// Queue a pass-2 failure.
    pub fn push_suggestion_error(&self, error: LlmError) {
        self.suggestions.lock().push_back(Err(error));
    }
}

#[async_trait]
impl Reasoner for ScriptedReasoner {
    async fn summarize(
        &self,
        _ctx: &ContextPacket,
        _candidates: &[CandidateAction],
        _memory: &str,
    ) -> Result<String, LlmError> {
        self.summaries
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::Scripted("no summary queued".into())))
    }

    async fn structure(
        &self,
        _ctx: &ContextPacket,
        _summary: &str,
    ) -> Result<Suggestion, LlmError> {
        self.suggestions
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::Scripted("no suggestion queued".into())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn replays_in_order() {
        let reasoner = ScriptedReasoner::new();
        reasoner.push_summary("first");
        reasoner.push_summary("second");

        let ctx = ContextPacket::new(Utc::now());
        assert_eq!(reasoner.summarize(&ctx, &[], "").await.unwrap(), "first");
        assert_eq!(reasoner.summarize(&ctx, &[], "").await.unwrap(), "second");
    }

    #[tokio::test]
    async fn exhausted_queue_errors() {
        let reasoner = ScriptedReasoner::new();
        let ctx = ContextPacket::new(Utc::now());
        let err = reasoner.structure(&ctx, "s").await.unwrap_err();
        assert!(matches!(err, LlmError::Scripted(_)));
    }
}
