mod embedding_repository;
mod issue_source;
mod vector_repository;

pub use embedding_repository::EmbeddingRepository;
pub use issue_source::IssueSource;
pub use vector_repository::VectorRepository;
