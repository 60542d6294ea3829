use async_trait::async_trait;
use common::{AssistantError, AssistantResult, Service};
use domain::config::VectorStoreConfig;
use domain::{Document, DomainError, EmbeddingRepository, SearchHit, VectorRepository};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};
use uuid::Uuid;

const API_PATH: &str = "api/json/v1";

/// A collection in an Astra DB database, reached through the Data API.
///
/// Documents are stored as `{_id, content, metadata, $vector}`. Vectors come
/// from the configured embedder; the database ranks them with cosine
/// similarity.
pub struct AstraVectorStore {
    client: reqwest::Client,
    endpoint: String,
    token: String,
    keyspace: String,
    collection: String,
    batch_size: usize,
    embeddings: Arc<dyn EmbeddingRepository>,
}

impl AstraVectorStore {
    pub fn new(
        config: &VectorStoreConfig,
        embeddings: Arc<dyn EmbeddingRepository>,
    ) -> AssistantResult<Self> {
        let endpoint = config
            .api_endpoint
            .as_deref()
            .ok_or_else(|| AssistantError::Config("ASTRA_DB_API_ENDPOINT is not set".into()))?;
        let token = config
            .token
            .clone()
            .ok_or_else(|| AssistantError::Config("ASTRA_DB_APPLICATION_TOKEN is not set".into()))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AssistantError::network(Service::VectorStore, e))?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token,
            keyspace: config.keyspace_or_default().to_string(),
            collection: config.collection.clone(),
            batch_size: config.insert_batch_size.clamp(1, domain::config::MAX_INSERT_BATCH_SIZE),
            embeddings,
        })
    }

    pub fn keyspace(&self) -> &str {
        &self.keyspace
    }

    fn keyspace_url(&self) -> String {
        format!("{}/{}/{}", self.endpoint, API_PATH, self.keyspace)
    }

    fn collection_url(&self) -> String {
        format!("{}/{}", self.keyspace_url(), self.collection)
    }

    /// POST one Data API command and return the decoded response.
    async fn command(&self, url: String, body: Value) -> AssistantResult<Value> {
        let response = self
            .client
            .post(url)
            .header("Token", &self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| AssistantError::network(Service::VectorStore, e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Data API request failed with {}: {}", status, error_text);
            return Err(AssistantError::api(
                Service::VectorStore,
                Some(status.as_u16()),
                error_text,
            ));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| AssistantError::network(Service::VectorStore, e))?;

        // The Data API reports command failures with a 200 status
        if let Some(errors) = payload.get("errors").and_then(Value::as_array) {
            if !errors.is_empty() {
                let message = errors
                    .iter()
                    .map(|e| {
                        e.get("message")
                            .and_then(Value::as_str)
                            .map(str::to_string)
                            .unwrap_or_else(|| e.to_string())
                    })
                    .collect::<Vec<_>>()
                    .join("; ");
                error!("Data API command failed: {}", message);
                return Err(AssistantError::api(Service::VectorStore, None, message));
            }
        }

        Ok(payload)
    }

    async fn insert_batch(&self, documents: Vec<Value>) -> AssistantResult<Vec<String>> {
        let expected: Vec<String> = documents
            .iter()
            .filter_map(|d| d.get("_id").and_then(Value::as_str).map(str::to_string))
            .collect();

        let payload = self
            .command(
                self.collection_url(),
                json!({
                    "insertMany": {
                        "documents": documents,
                        "options": { "ordered": false }
                    }
                }),
            )
            .await?;

        let inserted: Vec<String> = payload
            .pointer("/status/insertedIds")
            .and_then(Value::as_array)
            .map(|ids| ids.iter().filter_map(id_to_string).collect())
            .unwrap_or(expected);

        Ok(inserted)
    }
}

fn id_to_string(id: &Value) -> Option<String> {
    match id {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn hit_from_stored(stored: &Value) -> SearchHit {
    let content = stored
        .get("content")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let metadata = stored
        .get("metadata")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_else(Map::new);
    let score = stored
        .get("$similarity")
        .and_then(Value::as_f64)
        .map(|s| s as f32);

    SearchHit::new(
        Document {
            page_content: content,
            metadata,
        },
        score,
    )
}

#[async_trait]
impl VectorRepository for AstraVectorStore {
    fn collection_name(&self) -> &str {
        &self.collection
    }

    async fn create_collection(&self) -> AssistantResult<()> {
        self.command(
            self.keyspace_url(),
            json!({
                "createCollection": {
                    "name": self.collection,
                    "options": {
                        "vector": {
                            "dimension": self.embeddings.dimension(),
                            "metric": "cosine"
                        }
                    }
                }
            }),
        )
        .await?;

        info!(
            "Collection '{}' ready in keyspace '{}'",
            self.collection, self.keyspace
        );
        Ok(())
    }

    async fn delete_collection(&self) -> AssistantResult<()> {
        self.command(
            self.keyspace_url(),
            json!({ "deleteCollection": { "name": self.collection } }),
        )
        .await?;

        info!("Collection '{}' deleted", self.collection);
        Ok(())
    }

    async fn add_documents(&self, documents: &[Document]) -> AssistantResult<Vec<String>> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }
        for document in documents {
            document.validate()?;
        }

        let contents: Vec<String> = documents.iter().map(|d| d.page_content.clone()).collect();
        let vectors = self.embeddings.embed_documents(&contents).await?;
        if vectors.len() != documents.len() {
            return Err(DomainError::EmbeddingCountMismatch {
                sent: documents.len(),
                received: vectors.len(),
            }
            .into());
        }

        let stored: Vec<Value> = documents
            .iter()
            .zip(vectors)
            .map(|(document, vector)| {
                json!({
                    "_id": Uuid::new_v4().to_string(),
                    "content": document.page_content,
                    "metadata": document.metadata,
                    "$vector": vector,
                })
            })
            .collect();

        let mut ids = Vec::with_capacity(stored.len());
        for batch in stored.chunks(self.batch_size) {
            debug!("Inserting batch of {} documents", batch.len());
            ids.extend(self.insert_batch(batch.to_vec()).await?);
        }

        info!(
            "Inserted {} documents into '{}'",
            ids.len(),
            self.collection
        );
        Ok(ids)
    }

    async fn similarity_search(&self, query: &str, k: usize) -> AssistantResult<Vec<SearchHit>> {
        if k == 0 {
            return Err(DomainError::InvalidSearchLimit(k).into());
        }

        let vector = self.embeddings.embed_query(query).await?;
        let payload = self
            .command(
                self.collection_url(),
                json!({
                    "find": {
                        "sort": { "$vector": vector },
                        "options": { "limit": k, "includeSimilarity": true }
                    }
                }),
            )
            .await?;

        let hits: Vec<SearchHit> = payload
            .pointer("/data/documents")
            .and_then(Value::as_array)
            .map(|docs| docs.iter().map(hit_from_stored).collect())
            .unwrap_or_default();

        debug!("Similarity search returned {} hits", hits.len());
        Ok(hits)
    }
}

/// Build a store for `config` and make sure its collection exists.
pub async fn connect(
    config: &VectorStoreConfig,
    embeddings: Arc<dyn EmbeddingRepository>,
) -> AssistantResult<AstraVectorStore> {
    let store = AstraVectorStore::new(config, embeddings)?;
    store.create_collection().await?;
    Ok(store)
}
