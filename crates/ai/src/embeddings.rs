use async_trait::async_trait;
use common::{AssistantError, AssistantResult, Service};
use domain::config::EmbeddingConfig;
use domain::{DomainError, EmbeddingRepository, EmbeddingVector};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

/// Ollama embedding client
pub struct OllamaEmbeddings {
    client: reqwest::Client,
    base_url: String,
    model: String,
    dimension: usize,
    batch_size: usize,
}

#[derive(Serialize)]
struct OllamaEmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
    truncate: bool,
}

#[derive(Deserialize)]
struct OllamaEmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

impl OllamaEmbeddings {
    pub fn new(config: &EmbeddingConfig) -> AssistantResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AssistantError::network(Service::Embedding, e))?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            dimension: config.dimension,
            batch_size: config.batch_size.max(1),
        })
    }

    async fn embed(&self, texts: &[String]) -> AssistantResult<Vec<EmbeddingVector>> {
        let request = OllamaEmbedRequest {
            model: &self.model,
            input: texts,
            truncate: true,
        };

        let response = self
            .client
            .post(format!("{}/api/embed", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| AssistantError::network(Service::Embedding, e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Ollama embedding failed: {}", error_text);
            return Err(AssistantError::api(
                Service::Embedding,
                Some(status.as_u16()),
                error_text,
            ));
        }

        let embed_response: OllamaEmbedResponse = response
            .json()
            .await
            .map_err(|e| AssistantError::network(Service::Embedding, e))?;

        if embed_response.embeddings.len() != texts.len() {
            return Err(DomainError::EmbeddingCountMismatch {
                sent: texts.len(),
                received: embed_response.embeddings.len(),
            }
            .into());
        }

        for vector in &embed_response.embeddings {
            if vector.len() != self.dimension {
                return Err(DomainError::EmbeddingDimensionMismatch {
                    expected: self.dimension,
                    actual: vector.len(),
                }
                .into());
            }
        }

        Ok(embed_response.embeddings)
    }
}

#[async_trait]
impl EmbeddingRepository for OllamaEmbeddings {
    async fn embed_query(&self, text: &str) -> AssistantResult<EmbeddingVector> {
        let mut vectors = self.embed(&[text.to_string()]).await?;
        vectors.pop().ok_or_else(|| {
            DomainError::EmbeddingCountMismatch {
                sent: 1,
                received: 0,
            }
            .into()
        })
    }

    async fn embed_documents(&self, texts: &[String]) -> AssistantResult<Vec<EmbeddingVector>> {
        let mut all_embeddings = Vec::with_capacity(texts.len());

        for chunk in texts.chunks(self.batch_size) {
            debug!(
                model = %self.model,
                batch = chunk.len(),
                "Embedding document batch"
            );
            all_embeddings.extend(self.embed(chunk).await?);
        }

        Ok(all_embeddings)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn config(url: String, dimension: usize, batch_size: usize) -> EmbeddingConfig {
        EmbeddingConfig {
            url,
            dimension,
            batch_size,
            ..EmbeddingConfig::default()
        }
    }

    #[tokio::test]
    async fn test_embed_query() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/embed")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "model": "nomic-embed-text",
                "input": ["flash messages"],
                "truncate": true
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"model":"nomic-embed-text","embeddings":[[0.1,0.2,0.3]]}"#)
            .create_async()
            .await;

        let embeddings = OllamaEmbeddings::new(&config(server.url(), 3, 32)).unwrap();
        let vector = embeddings.embed_query("flash messages").await.unwrap();

        assert_eq!(vector, vec![0.1, 0.2, 0.3]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_documents_are_batched() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/embed")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"embeddings":[[1.0,0.0],[0.0,1.0]]}"#)
            .expect(2)
            .create_async()
            .await;

        let embeddings = OllamaEmbeddings::new(&config(server.url(), 2, 2)).unwrap();
        let texts: Vec<String> = (0..4).map(|i| format!("issue {i}")).collect();
        let vectors = embeddings.embed_documents(&texts).await.unwrap();

        assert_eq!(vectors.len(), 4);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_error_is_reported() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/embed")
            .with_status(404)
            .with_body(r#"{"error":"model \"nomic-embed-text\" not found, try pulling it first"}"#)
            .create_async()
            .await;

        let embeddings = OllamaEmbeddings::new(&config(server.url(), 3, 32)).unwrap();
        let err = embeddings.embed_query("anything").await.unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert_eq!(err.service(), Some(Service::Embedding));
        assert!(err.to_string().contains("try pulling it first"));
    }

    #[tokio::test]
    async fn test_dimension_mismatch_rejected() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/embed")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"embeddings":[[0.5,0.5]]}"#)
            .create_async()
            .await;

        let embeddings = OllamaEmbeddings::new(&config(server.url(), 768, 32)).unwrap();
        let err = embeddings.embed_query("short vector").await.unwrap_err();

        assert!(err.to_string().contains("expected 768, got 2"));
    }

    #[tokio::test]
    async fn test_trailing_slash_in_url() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/embed")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"embeddings":[[0.5]]}"#)
            .create_async()
            .await;

        let embeddings = OllamaEmbeddings::new(&config(format!("{}/", server.url()), 1, 32)).unwrap();
        embeddings.embed_query("x").await.unwrap();
        mock.assert_async().await;
    }
}
