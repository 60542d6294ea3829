//! Document - text plus opaque metadata, the unit stored in the vector store

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{DomainError, DomainResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Text that gets embedded and returned by searches
    pub page_content: String,

    /// Passed through to the store untouched
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl Document {
    pub fn new(page_content: impl Into<String>) -> Self {
        Self {
            page_content: page_content.into(),
            metadata: Map::new(),
        }
    }

    pub fn with_metadata(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    /// Documents with blank content cannot be embedded
    pub fn validate(&self) -> DomainResult<()> {
        if self.page_content.trim().is_empty() {
            return Err(DomainError::EmptyContent);
        }
        Ok(())
    }
}

/// A document returned by a similarity search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub document: Document,

    /// Service-reported similarity, higher is closer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

impl SearchHit {
    pub fn new(document: Document, score: Option<f32>) -> Self {
        Self { document, score }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_builder() {
        let doc = Document::new("Crash on divide by zero")
            .with_metadata("number", 7)
            .with_metadata("url", "https://github.com/o/r/issues/7");

        assert_eq!(doc.metadata["number"], 7);
        assert_eq!(doc.metadata["url"], "https://github.com/o/r/issues/7");
    }

    #[test]
    fn test_blank_document_rejected() {
        assert_eq!(Document::new(" \n").validate(), Err(DomainError::EmptyContent));
        assert!(Document::new("title").validate().is_ok());
    }
}
