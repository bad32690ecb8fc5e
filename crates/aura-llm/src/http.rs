//! HTTP reasoner against an OpenAI-compatible chat-completions endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use aura_core::{CandidateAction, ContextPacket, Suggestion};

use crate::errors::LlmError;
use crate::prompts::{structure_prompt, summary_prompt};
use crate::reasoner::Reasoner;

/// Temperature for both passes — deterministic output by default.
const TEMPERATURE: f64 = 0.0;

/// How much of an error body to keep in diagnostics.
const ERROR_BODY_LIMIT: usize = 512;

/// Configuration for [`HttpReasoner`].
#[derive(Clone, Debug)]
pub struct HttpReasonerConfig {
    /// Base URL of the chat-completions API (without `/chat/completions`).
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    /// Bearer token, if the endpoint requires one.
    pub api_key: Option<String>,
    /// Per-call request timeout.
    pub timeout: Duration,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f64,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Reasoner backed by an OpenAI-compatible chat-completions endpoint.
pub struct HttpReasoner {
    config: HttpReasonerConfig,
    client: reqwest::Client,
}

impl std::fmt::Debug for HttpReasoner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpReasoner")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .finish_non_exhaustive()
    }
}

impl HttpReasoner {
    /// Build a reasoner with its own HTTP client.
    pub fn new(config: HttpReasonerConfig) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Http(e.to_string()))?;
        Ok(Self { config, client })
    }

    /// Run one completion call and return the assistant text.
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let request = ChatRequest {
            model: &self.config.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
        };

        let mut builder = self.client.post(&url).json(&request);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > ERROR_BODY_LIMIT {
                let mut end = ERROR_BODY_LIMIT;
                while !body.is_char_boundary(end) {
                    end -= 1;
                }
                body.truncate(end);
            }
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::MalformedResponse(e.to_string()))?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| LlmError::MalformedResponse("no choices in response".into()))?;
        Ok(content)
    }
}

#[async_trait]
impl Reasoner for HttpReasoner {
    #[instrument(skip_all, fields(model = %self.config.model))]
    async fn summarize(
        &self,
        ctx: &ContextPacket,
        candidates: &[CandidateAction],
        memory: &str,
    ) -> Result<String, LlmError> {
        let summary = self
            .complete(&summary_prompt(ctx, candidates, memory))
            .await?;
        debug!(len = summary.len(), "pass 1 summary received");
        Ok(summary.trim().to_string())
    }

    #[instrument(skip_all, fields(model = %self.config.model))]
    async fn structure(
        &self,
        ctx: &ContextPacket,
        summary: &str,
    ) -> Result<Suggestion, LlmError> {
        let raw = self.complete(&structure_prompt(ctx, summary)).await?;
        parse_suggestion(&raw)
    }
}

/// Parse pass-2 output into a [`Suggestion`], stripping Markdown code
/// fences the model may wrap around the JSON.
pub fn parse_suggestion(raw: &str) -> Result<Suggestion, LlmError> {
    let text = strip_code_fences(raw);
    let suggestion: Suggestion =
        serde_json::from_str(text).map_err(|e| LlmError::Schema(e.to_string()))?;
    if let Some(confidence) = suggestion.confidence
        && !(0.0..=1.0).contains(&confidence)
    {
        return Err(LlmError::Schema(format!(
            "confidence {confidence} out of range [0, 1]"
        )));
    }
    Ok(suggestion)
}

/// Strip a surrounding ```/```json fence if present.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") up to the first newline.
    let body = rest.split_once('\n').map_or(rest, |(_, body)| body);
    body.strip_suffix("```").unwrap_or(body).trim()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
