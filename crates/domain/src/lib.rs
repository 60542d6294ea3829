//! Domain layer for issuescout
//!
//! Entities, configuration types and the abstractions over external services.
//! No network or storage code lives here.

pub mod config;
pub mod entities;
pub mod errors;
pub mod repositories;

pub use entities::{Document, IssueRecord, SearchHit};
pub use errors::{DomainError, DomainResult};
pub use repositories::{EmbeddingRepository, IssueSource, VectorRepository};

pub type EmbeddingVector = Vec<f32>;
