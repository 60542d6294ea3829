use async_trait::async_trait;
use common::AssistantResult;
use domain::{EmbeddingRepository, EmbeddingVector};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Deterministic embedder for development and tests.
///
/// Equal texts always map to equal unit vectors; no server is contacted.
pub struct MockEmbeddings {
    dimension: usize,
    calls: AtomicUsize,
}

impl MockEmbeddings {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of embed calls served so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    fn vector_for(&self, text: &str) -> EmbeddingVector {
        let mut vector: Vec<f32> = (0..self.dimension)
            .map(|i| {
                let mut hasher = DefaultHasher::new();
                text.hash(&mut hasher);
                i.hash(&mut hasher);
                (hasher.finish() % 2000) as f32 / 1000.0 - 1.0
            })
            .collect();

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        vector
    }
}

#[async_trait]
impl EmbeddingRepository for MockEmbeddings {
    async fn embed_query(&self, text: &str) -> AssistantResult<EmbeddingVector> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(self.vector_for(text))
    }

    async fn embed_documents(&self, texts: &[String]) -> AssistantResult<Vec<EmbeddingVector>> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(texts.iter().map(|t| self.vector_for(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
