//! EmbeddingRepository - abstraction over the embedding model service

use async_trait::async_trait;
use common::AssistantResult;

use crate::EmbeddingVector;

/// Turns text into vectors. The model itself always runs out of process.
#[async_trait]
pub trait EmbeddingRepository: Send + Sync {
    /// Embed a search query
    async fn embed_query(&self, text: &str) -> AssistantResult<EmbeddingVector>;

    /// Embed many texts, one vector per input in input order
    async fn embed_documents(&self, texts: &[String]) -> AssistantResult<Vec<EmbeddingVector>>;

    /// Vector length produced by the model
    fn dimension(&self) -> usize;
}
