//! Reasoner error taxonomy.

use thiserror::Error;

/// Failure of one reasoner call.
///
/// The orchestrator distinguishes [`LlmError::Schema`] (pass 2 produced
/// output that is not a valid suggestion) from everything else (transport
/// or service failure) when building the fallback deny reason.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Transport-level failure (connect, TLS, body read).
    #[error("reasoner transport error: {0}")]
    Http(String),

    /// The service answered with a non-success status.
    #[error("reasoner API error: status {status}: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated for logging.
        body: String,
    },

    /// The call exceeded its deadline.
    #[error("reasoner call timed out")]
    Timeout,

    /// The response body did not have the expected provider shape.
    #[error("malformed reasoner response: {0}")]
    MalformedResponse(String),

    /// Pass-2 output failed to parse as a suggestion.
    #[error("structured output failed suggestion schema: {0}")]
    Schema(String),

    /// Test-double exhaustion or other scripted failure.
    #[error("scripted reasoner: {0}")]
    Scripted(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err.to_string())
        }
    }
}
