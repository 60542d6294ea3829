//! Vector storage and issue ingestion for issuescout.
//!
//! The vector database does the indexing and ranking. This crate builds the
//! requests, batches inserts and moves issues from the tracker into the
//! collection.

pub mod astra;
pub mod github;
pub mod ingestion;
pub mod retriever;

pub use astra::{connect, AstraVectorStore};
pub use github::GithubIssueSource;
pub use ingestion::{refresh_collection, RefreshReport};
pub use retriever::Retriever;
