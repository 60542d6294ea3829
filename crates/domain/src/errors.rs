//! Domain Errors - violations of the rules documents must satisfy

use common::AssistantError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Content cannot be empty")]
    EmptyContent,

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    EmbeddingDimensionMismatch { expected: usize, actual: usize },

    #[error("Embedding count mismatch: sent {sent} texts, received {received} vectors")]
    EmbeddingCountMismatch { sent: usize, received: usize },

    #[error("Invalid search limit: {0}")]
    InvalidSearchLimit(usize),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<DomainError> for AssistantError {
    fn from(err: DomainError) -> Self {
        AssistantError::Validation(err.to_string())
    }
}
