//! VectorRepository - abstraction over a vector database collection
//!
//! Indexing and similarity ranking happen inside the service; implementations
//! only translate calls into requests.

use async_trait::async_trait;
use common::AssistantResult;

use crate::{Document, SearchHit};

#[async_trait]
pub trait VectorRepository: Send + Sync {
    fn collection_name(&self) -> &str;

    /// Create the collection if it does not exist
    async fn create_collection(&self) -> AssistantResult<()>;

    /// Drop the collection and everything in it
    async fn delete_collection(&self) -> AssistantResult<()>;

    /// Embed and insert documents, returning the ids assigned to them
    async fn add_documents(&self, documents: &[Document]) -> AssistantResult<Vec<String>>;

    /// The `k` documents closest to `query`, closest first
    async fn similarity_search(&self, query: &str, k: usize) -> AssistantResult<Vec<SearchHit>>;
}
