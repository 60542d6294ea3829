//! Repopulating the vector collection from the issue tracker

use common::{AssistantResult, OperationTimer};
use domain::{Document, IssueSource, VectorRepository};
use tracing::{info, warn};

/// What one refresh did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshReport {
    /// Items returned by the tracker, pull requests included
    pub fetched: usize,
    pub skipped_pull_requests: usize,
    pub inserted: usize,
}

/// Fetch every issue, drop and recreate the collection, then insert the
/// issues as documents.
///
/// A failed delete is logged and ignored; the collection may simply not
/// exist yet. Pull requests are skipped unless `include_pull_requests`.
pub async fn refresh_collection(
    source: &dyn IssueSource,
    store: &dyn VectorRepository,
    include_pull_requests: bool,
) -> AssistantResult<RefreshReport> {
    let mut timer = OperationTimer::new("refresh_collection");
    timer.add_field("source", source.describe());
    timer.add_field("collection", store.collection_name());

    let result = run_refresh(source, store, include_pull_requests).await;
    timer.finish_with_result(&result);
    result
}

async fn run_refresh(
    source: &dyn IssueSource,
    store: &dyn VectorRepository,
    include_pull_requests: bool,
) -> AssistantResult<RefreshReport> {
    let records = source.fetch_issues().await?;
    let fetched = records.len();

    let documents: Vec<Document> = records
        .iter()
        .filter(|r| include_pull_requests || !r.is_pull_request)
        .map(|r| r.to_document())
        .collect();
    let skipped_pull_requests = fetched - documents.len();

    if let Err(e) = store.delete_collection().await {
        warn!(
            "Ignoring failed delete of collection '{}': {}",
            store.collection_name(),
            e
        );
    }

    store.create_collection().await?;
    let ids = store.add_documents(&documents).await?;

    info!(
        "Refreshed '{}' from {}: {} fetched, {} pull requests skipped, {} inserted",
        store.collection_name(),
        source.describe(),
        fetched,
        skipped_pull_requests,
        ids.len()
    );

    Ok(RefreshReport {
        fetched,
        skipped_pull_requests,
        inserted: ids.len(),
    })
}
