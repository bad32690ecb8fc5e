//! The two-pass reasoner trait.

use async_trait::async_trait;

use aura_core::{CandidateAction, ContextPacket, Suggestion};

use crate::errors::LlmError;

/// External reasoning service: free-text summary, then structured output.
///
/// Pass 2 depends on pass 1's output, so implementations are called
/// strictly sequentially — never concurrently — within one decision cycle.
#[async_trait]
pub trait Reasoner: Send + Sync {
    /// Pass 1: summarize the situation and the most relevant candidate in
    /// 2-4 sentences.
    async fn summarize(
        &self,
        ctx: &ContextPacket,
        candidates: &[CandidateAction],
        memory: &str,
    ) -> Result<String, LlmError>;

    /// Pass 2: produce a structured suggestion from the pass-1 summary.
    ///
    /// Output that fails the suggestion schema is an [`LlmError::Schema`],
    /// a recoverable error — never a panic.
    async fn structure(&self, ctx: &ContextPacket, summary: &str)
    -> Result<Suggestion, LlmError>;
}
