//! IssueRecord - one tracker item as fetched from the issue tracker

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Document;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueRecord {
    pub number: u64,
    pub title: String,
    pub body: Option<String>,
    pub url: String,
    pub state: String,
    pub author: String,
    pub comments: u64,
    pub labels: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub is_pull_request: bool,
}

impl IssueRecord {
    /// Title, then the body on the following lines when there is one.
    pub fn page_content(&self) -> String {
        match self.body.as_deref().map(str::trim) {
            Some(body) if !body.is_empty() => format!("{}\n{}", self.title, body),
            _ => self.title.clone(),
        }
    }

    pub fn to_document(&self) -> Document {
        Document::new(self.page_content())
            .with_metadata("number", self.number)
            .with_metadata("url", self.url.clone())
            .with_metadata("title", self.title.clone())
            .with_metadata("state", self.state.clone())
            .with_metadata("author", self.author.clone())
            .with_metadata("comments", self.comments)
            .with_metadata(
                "labels",
                Value::Array(self.labels.iter().cloned().map(Value::String).collect()),
            )
            .with_metadata("created_at", self.created_at.to_rfc3339())
    }
}
