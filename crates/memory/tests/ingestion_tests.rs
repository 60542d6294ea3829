use async_trait::async_trait;
use chrono::Utc;
use common::{AssistantError, AssistantResult, Service};
use domain::{Document, IssueRecord, IssueSource, SearchHit, VectorRepository};
use memory::{refresh_collection, RefreshReport, Retriever};
use std::sync::{Arc, Mutex};

struct StaticSource {
    records: Vec<IssueRecord>,
}

#[async_trait]
impl IssueSource for StaticSource {
    async fn fetch_issues(&self) -> AssistantResult<Vec<IssueRecord>> {
        Ok(self.records.clone())
    }

    fn describe(&self) -> String {
        "octo/solver".to_string()
    }
}

struct FailingSource;

#[async_trait]
impl IssueSource for FailingSource {
    async fn fetch_issues(&self) -> AssistantResult<Vec<IssueRecord>> {
        Err(AssistantError::api(Service::IssueTracker, Some(403), "rate limited"))
    }

    fn describe(&self) -> String {
        "octo/solver".to_string()
    }
}

/// Records every call; `delete_collection` can be made to fail.
#[derive(Default)]
struct RecordingStore {
    calls: Mutex<Vec<String>>,
    stored: Mutex<Vec<Document>>,
    fail_delete: bool,
}

impl RecordingStore {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl VectorRepository for RecordingStore {
    fn collection_name(&self) -> &str {
        "github"
    }

    async fn create_collection(&self) -> AssistantResult<()> {
        self.calls.lock().unwrap().push("create".to_string());
        Ok(())
    }

    async fn delete_collection(&self) -> AssistantResult<()> {
        self.calls.lock().unwrap().push("delete".to_string());
        if self.fail_delete {
            return Err(AssistantError::api(
                Service::VectorStore,
                None,
                "Collection does not exist",
            ));
        }
        self.stored.lock().unwrap().clear();
        Ok(())
    }

    async fn add_documents(&self, documents: &[Document]) -> AssistantResult<Vec<String>> {
        self.calls.lock().unwrap().push("add".to_string());
        self.stored.lock().unwrap().extend_from_slice(documents);
        Ok((0..documents.len()).map(|i| format!("id-{i}")).collect())
    }

    async fn similarity_search(&self, _query: &str, k: usize) -> AssistantResult<Vec<SearchHit>> {
        Ok(self
            .stored
            .lock()
            .unwrap()
            .iter()
            .take(k)
            .cloned()
            .map(|d| SearchHit::new(d, Some(0.5)))
            .collect())
    }
}

fn record(number: u64, is_pull_request: bool) -> IssueRecord {
    IssueRecord {
        number,
        title: format!("Issue {number}"),
        body: Some("body".to_string()),
        url: format!("https://github.com/octo/solver/issues/{number}"),
        state: "open".to_string(),
        author: "octocat".to_string(),
        comments: 0,
        labels: Vec::new(),
        created_at: Utc::now(),
        is_pull_request,
    }
}

#[tokio::test]
async fn test_refresh_deletes_recreates_and_inserts() {
    let source = StaticSource {
        records: vec![record(1, false), record(2, true), record(3, false)],
    };
    let store = RecordingStore::default();

    let report = refresh_collection(&source, &store, false).await.unwrap();

    assert_eq!(
        report,
        RefreshReport {
            fetched: 3,
            skipped_pull_requests: 1,
            inserted: 2,
        }
    );
    assert_eq!(store.calls(), vec!["delete", "create", "add"]);
    assert_eq!(store.stored.lock().unwrap()[1].page_content, "Issue 3\nbody");
}

#[tokio::test]
async fn test_refresh_can_keep_pull_requests() {
    let source = StaticSource {
        records: vec![record(1, false), record(2, true)],
    };
    let store = RecordingStore::default();

    let report = refresh_collection(&source, &store, true).await.unwrap();

    assert_eq!(report.skipped_pull_requests, 0);
    assert_eq!(report.inserted, 2);
}

#[tokio::test]
async fn test_failed_delete_is_ignored() {
    let source = StaticSource {
        records: vec![record(1, false)],
    };
    let store = RecordingStore {
        fail_delete: true,
        ..RecordingStore::default()
    };

    let report = refresh_collection(&source, &store, false).await.unwrap();

    assert_eq!(report.inserted, 1);
    assert_eq!(store.calls(), vec!["delete", "create", "add"]);
}

#[tokio::test]
async fn test_fetch_failure_leaves_collection_alone() {
    let store = RecordingStore::default();

    let err = refresh_collection(&FailingSource, &store, false)
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(403));
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn test_retriever_uses_fixed_k() {
    let store = Arc::new(RecordingStore::default());
    let documents: Vec<Document> = (0..5).map(|i| Document::new(format!("doc {i}"))).collect();
    store.add_documents(&documents).await.unwrap();

    let retriever = Retriever::new(store, 3);
    let found = retriever.relevant_documents("doc").await.unwrap();

    assert_eq!(retriever.k(), 3);
    assert_eq!(found.len(), 3);
    assert_eq!(found[0].page_content, "doc 0");
}
