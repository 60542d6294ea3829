mod document;
mod issue;

pub use document::{Document, SearchHit};
pub use issue::IssueRecord;
