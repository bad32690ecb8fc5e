//! # aura-memory
//!
//! Similarity-indexed fact store for the Aura decision core.
//!
//! - **Store contract**: [`store::MemoryStore`] — deduplicated writes
//!   ([`store::AddOutcome`]) and relevance queries returning a text blob
//! - **In-memory backend**: [`store::VectorMemoryStore`] — cosine
//!   nearest-neighbor over an injected embedding service
//! - **Embeddings**: [`embedding::EmbeddingService`] with the deterministic
//!   [`embedding::HashEmbedding`] implementation
//!
//! Real vector-search backends and embedding models are external concerns;
//! this crate gives the orchestrator a collaborator it can own in-process
//! and tests something deterministic to assert against.
//!
//! ## Crate Position
//!
//! Standalone leaf (no aura-core dependency — facts are plain text plus
//! JSON metadata). Depended on by: aura-runtime, aura-agent.

#![deny(unsafe_code)]

pub mod embedding;
pub mod errors;
pub mod store;

pub use embedding::{EmbeddingService, HashEmbedding, cosine_similarity};
pub use errors::MemoryError;
pub use store::{AddOutcome, MemoryStore, VectorMemoryStore};
