//! IssueSource - abstraction over the external issue tracker

use async_trait::async_trait;
use common::AssistantResult;

use crate::IssueRecord;

#[async_trait]
pub trait IssueSource: Send + Sync {
    /// Fetch every issue the source is configured for
    async fn fetch_issues(&self) -> AssistantResult<Vec<IssueRecord>>;

    /// Human-readable name of what is fetched, e.g. `owner/repo`
    fn describe(&self) -> String;
}
