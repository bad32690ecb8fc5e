//! The memory-store contract and the in-memory cosine backend.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use crate::embedding::{EmbeddingService, cosine_similarity};
use crate::errors::MemoryError;

/// Returned when the store holds nothing at all.
pub const NO_INFORMATION: &str = "No information in memory.";

/// Returned when the store holds facts but none are relevant.
pub const NO_RELEVANT_INFORMATION: &str = "No relevant information found in memory.";

/// Outcome of a deduplicated write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AddOutcome {
    /// Stored under the given document id.
    Stored(String),
    /// A sufficiently similar fact already exists; nothing was written.
    DuplicateSkipped,
}

/// Contract for the similarity-indexed fact store.
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// Store a fact unless a near-duplicate already exists.
    async fn add_document(&self, text: &str, metadata: Value) -> Result<AddOutcome, MemoryError>;

    /// Summarize up to `n_results` relevant stored facts as a bulleted text
    /// blob, or a sentinel string when there is nothing to return.
    async fn get_relevant_info(&self, query: &str, n_results: usize)
    -> Result<String, MemoryError>;
}

struct StoredFact {
    id: String,
    text: String,
    #[allow(dead_code)] // audit payload, read by operators not by the pipeline
    metadata: serde_json::Map<String, Value>,
    embedding: Vec<f32>,
}

/// In-memory cosine nearest-neighbor store over an injected embedding
/// service.
pub struct VectorMemoryStore {
    embedder: Arc<dyn EmbeddingService>,
    /// Cosine similarity at or above which a new fact is a duplicate.
    similarity_threshold: f32,
    facts: RwLock<Vec<StoredFact>>,
}

impl VectorMemoryStore {
    /// Create an empty store.
    pub fn new(embedder: Arc<dyn EmbeddingService>, similarity_threshold: f64) -> Self {
        Self {
            embedder,
            similarity_threshold: similarity_threshold as f32,
            facts: RwLock::new(Vec::new()),
        }
    }

    /// Number of stored facts.
    pub fn len(&self) -> usize {
        self.facts.read().len()
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.facts.read().is_empty()
    }

    fn nearest_similarity(&self, embedding: &[f32]) -> Option<(String, f32)> {
        let facts = self.facts.read();
        facts
            .iter()
            .map(|f| (f.text.clone(), cosine_similarity(&f.embedding, embedding)))
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
    }
}

/// Keep scalar metadata values as-is; serialize anything structured so the
/// stored record stays flat.
fn sanitize_metadata(metadata: Value) -> serde_json::Map<String, Value> {
    let mut out = serde_json::Map::new();
    if let Value::Object(map) = metadata {
        for (key, value) in map {
            let flat = match &value {
                Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Null => value,
                structured => Value::String(structured.to_string()),
            };
            let _ = out.insert(key, flat);
        }
    }
    let _ = out.insert(
        "timestamp".to_string(),
        Value::String(Utc::now().to_rfc3339()),
    );
    out
}

#[async_trait]
impl MemoryStore for VectorMemoryStore {
    async fn add_document(&self, text: &str, metadata: Value) -> Result<AddOutcome, MemoryError> {
        let embedding = self.embedder.embed_single(text).await?;

        if let Some((existing, similarity)) = self.nearest_similarity(&embedding)
            && similarity >= self.similarity_threshold
        {
            info!(similarity, existing = %existing, "skipped duplicate fact");
            return Ok(AddOutcome::DuplicateSkipped);
        }

        let id = Uuid::new_v4().to_string();
        self.facts.write().push(StoredFact {
            id: id.clone(),
            text: text.to_string(),
            metadata: sanitize_metadata(metadata),
            embedding,
        });
        debug!(id = %id, "stored fact");
        Ok(AddOutcome::Stored(id))
    }

    async fn get_relevant_info(
        &self,
        query: &str,
        n_results: usize,
    ) -> Result<String, MemoryError> {
        if self.is_empty() {
            return Ok(NO_INFORMATION.to_string());
        }

        let query_embedding = self.embedder.embed_single(query).await?;
        let facts = self.facts.read();
        let mut ranked: Vec<(f32, &str)> = facts
            .iter()
            .map(|f| (cosine_similarity(&f.embedding, &query_embedding), f.text.as_str()))
            .collect();
        ranked.sort_by(|(a, _), (b, _)| b.total_cmp(a));

        let lines: Vec<String> = ranked
            .iter()
            .take(n_results)
            .map(|(_, text)| format!("- {text}"))
            .collect();
        if lines.is_empty() {
            return Ok(NO_RELEVANT_INFORMATION.to_string());
        }
        Ok(lines.join("\n"))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashEmbedding;
    use serde_json::json;

    fn store() -> VectorMemoryStore {
        VectorMemoryStore::new(Arc::new(HashEmbedding::new(64)), 0.85)
    }

    #[tokio::test]
    async fn empty_store_returns_no_information_sentinel() {
        let s = store();
        let blob = s.get_relevant_info("anything", 3).await.unwrap();
        assert_eq!(blob, NO_INFORMATION);
    }

    #[tokio::test]
    async fn stored_facts_come_back_bulleted() {
        let s = store();
        let outcome = s
            .add_document("User prefers a bath at 42 degrees after workouts.", json!({}))
            .await
            .unwrap();
        assert!(matches!(outcome, AddOutcome::Stored(_)));

        let blob = s.get_relevant_info("bath temperature", 3).await.unwrap();
        assert_eq!(blob, "- User prefers a bath at 42 degrees after workouts.");
    }

    #[tokio::test]
    async fn exact_duplicate_is_skipped() {
        let s = store();
        let _ = s.add_document("user likes calm music", json!({})).await.unwrap();
        let outcome = s.add_document("user likes calm music", json!({})).await.unwrap();
        assert_eq!(outcome, AddOutcome::DuplicateSkipped);
        assert_eq!(s.len(), 1);
    }

    #[tokio::test]
    async fn distinct_facts_are_both_stored() {
        let s = store();
        let _ = s.add_document("fact about lighting", json!({})).await.unwrap();
        let _ = s.add_document("completely different topic entirely", json!({})).await.unwrap();
        assert_eq!(s.len(), 2);
    }

    #[tokio::test]
    async fn n_results_caps_the_blob() {
        let s = store();
        for i in 0..5 {
            let _ = s.add_document(&format!("fact number {i}"), json!({})).await.unwrap();
        }
        let blob = s.get_relevant_info("fact", 2).await.unwrap();
        assert_eq!(blob.lines().count(), 2);
        assert!(blob.lines().all(|l| l.starts_with("- ")));
    }

    #[tokio::test]
    async fn zero_results_requested_returns_sentinel() {
        let s = store();
        let _ = s.add_document("something", json!({})).await.unwrap();
        let blob = s.get_relevant_info("something", 0).await.unwrap();
        assert_eq!(blob, NO_RELEVANT_INFORMATION);
    }

    #[test]
    fn metadata_is_flattened_and_stamped() {
        let meta = sanitize_metadata(json!({
            "accepted": true,
            "action": {"device_id": "smart_light_1", "command": "off"},
            "note": "plain"
        }));
        assert_eq!(meta["accepted"], json!(true));
        assert_eq!(meta["note"], json!("plain"));
        // structured values get serialized
        assert!(meta["action"].is_string());
        assert!(meta.contains_key("timestamp"));
    }
}
