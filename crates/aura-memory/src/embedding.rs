//! Embedding service trait and the deterministic hash-based implementation.

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::errors::MemoryError;

/// Trait for embedding text into vectors.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    /// Embed a single text into an L2-normalized vector.
    async fn embed_single(&self, text: &str) -> Result<Vec<f32>, MemoryError>;

    /// Output embedding dimensions.
    fn dimensions(&self) -> usize;
}

/// Cosine similarity of two vectors; zero when either has zero norm or the
/// lengths differ.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

fn l2_normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v {
            *x /= norm;
        }
    }
}

/// Deterministic embedding service.
///
/// Hashes input text with SHA-256 and uses the hash bytes as seeds for the
/// vector components, so identical texts always map to identical vectors
/// and the store behaves reproducibly without a model.
pub struct HashEmbedding {
    dims: usize,
}

impl HashEmbedding {
    /// Default dimensionality, matching common sentence-embedding models.
    pub const DEFAULT_DIMS: usize = 768;

    /// Create a service with the given dimensions.
    #[must_use]
    pub fn new(dims: usize) -> Self {
        Self { dims }
    }

    fn hash_to_vector(&self, text: &str) -> Vec<f32> {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        let hash = hasher.finalize();

        let mut v: Vec<f32> = (0..self.dims)
            .map(|i| {
                let byte = hash[i % hash.len()];
                // Map byte to [-1, 1]
                (f32::from(byte) / 127.5) - 1.0
            })
            .collect();
        l2_normalize(&mut v);
        v
    }
}

impl Default for HashEmbedding {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DIMS)
    }
}

#[async_trait]
impl EmbeddingService for HashEmbedding {
    async fn embed_single(&self, text: &str) -> Result<Vec<f32>, MemoryError> {
        Ok(self.hash_to_vector(text))
    }

    fn dimensions(&self) -> usize {
        self.dims
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
