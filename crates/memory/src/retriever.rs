use common::AssistantResult;
use domain::{Document, SearchHit, VectorRepository};
use std::sync::Arc;

pub const DEFAULT_TOP_K: usize = 3;

/// A vector store searched with a fixed result count
#[derive(Clone)]
pub struct Retriever {
    store: Arc<dyn VectorRepository>,
    k: usize,
}

impl Retriever {
    pub fn new(store: Arc<dyn VectorRepository>, k: usize) -> Self {
        Self { store, k }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub async fn search(&self, query: &str) -> AssistantResult<Vec<SearchHit>> {
        self.store.similarity_search(query, self.k).await
    }

    /// Documents for `query`, closest first
    pub async fn relevant_documents(&self, query: &str) -> AssistantResult<Vec<Document>> {
        Ok(self
            .search(query)
            .await?
            .into_iter()
            .map(|hit| hit.document)
            .collect())
    }
}
