//! Embedding providers for issuescout.
//!
//! The model runs in an Ollama server; this crate only speaks its HTTP API.

pub mod embeddings;
pub mod mock_models;

pub use embeddings::OllamaEmbeddings;
pub use mock_models::MockEmbeddings;
