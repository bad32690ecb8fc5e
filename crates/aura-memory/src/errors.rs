//! Memory store errors.

use thiserror::Error;

/// Failure of one memory-store operation.
///
/// The orchestrator treats read failure as an empty memory and logs write
/// failure without raising, so these never propagate past the pipeline.
#[derive(Debug, Error)]
pub enum MemoryError {
    /// The embedding service could not embed the text.
    #[error("embedding failed: {0}")]
    Embedding(String),

    /// The backing store rejected the operation.
    #[error("memory store failure: {0}")]
    Store(String),
}
