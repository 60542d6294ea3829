use domain::config::AssistantConfig;
use issuescout::{Answerer, App};
use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::json;
use std::path::Path;
use tempfile::TempDir;

/// Every external service pointed at one mock server
fn config(url: &str, notes_dir: &Path) -> AssistantConfig {
    let mut config = AssistantConfig::default();
    config.tracker.api_base = url.to_string();
    config.tracker.owner = "o".to_string();
    config.tracker.repo = "r".to_string();
    config.vector_store.api_endpoint = Some(url.to_string());
    config.vector_store.token = Some("AstraCS:test".to_string());
    config.embedding.url = url.to_string();
    config.embedding.dimension = 3;
    config.llm.api_base = url.to_string();
    config.llm.api_key = Some("test-api-key".to_string());
    config.notes.path = notes_dir.join("notes.txt");
    config
}

async fn mock_keyspace_commands(server: &mut ServerGuard) -> Mock {
    server
        .mock("POST", "/api/json/v1/default_keyspace")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":{"ok":1}}"#)
        .expect_at_least(1)
        .create_async()
        .await
}

async fn mock_embeddings(server: &mut ServerGuard) -> Mock {
    server
        .mock("POST", "/api/embed")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"embeddings":[[0.5,0.25,0.125]]}"#)
        .create_async()
        .await
}

#[tokio::test]
async fn test_refresh_stores_issues() {
    let mut server = Server::new_async().await;
    let notes = TempDir::new().unwrap();

    let keyspace = mock_keyspace_commands(&mut server).await;
    let _embed = mock_embeddings(&mut server).await;
    let issues = server
        .mock("GET", "/repos/o/r/issues")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([{
                "number": 1,
                "title": "Quadratic solver returns NaN",
                "body": "When a = 0",
                "html_url": "https://github.com/o/r/issues/1",
                "state": "open",
                "user": { "login": "octocat" },
                "comments": 0,
                "labels": [],
                "created_at": "2024-02-01T00:00:00Z"
            }])
            .to_string(),
        )
        .create_async()
        .await;
    let insert = server
        .mock("POST", "/api/json/v1/default_keyspace/github")
        .match_body(Matcher::PartialJson(json!({
            "insertMany": {
                "documents": [{
                    "content": "Quadratic solver returns NaN\nWhen a = 0",
                    "metadata": { "number": 1 },
                    "$vector": [0.5, 0.25, 0.125]
                }]
            }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":{"insertedIds":["id-1"]}}"#)
        .create_async()
        .await;

    let app = App::connect(config(&server.url(), notes.path())).await.unwrap();
    let report = app.refresh().await.unwrap();

    assert_eq!(report.fetched, 1);
    assert_eq!(report.inserted, 1);
    keyspace.assert_async().await;
    issues.assert_async().await;
    insert.assert_async().await;
}

#[tokio::test]
async fn test_question_answered_through_search() {
    let mut server = Server::new_async().await;
    let notes = TempDir::new().unwrap();

    let _keyspace = mock_keyspace_commands(&mut server).await;
    let _embed = mock_embeddings(&mut server).await;
    let find = server
        .mock("POST", "/api/json/v1/default_keyspace/github")
        .match_body(Matcher::PartialJson(json!({
            "find": { "options": { "limit": 3 } }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "data": {
                    "documents": [{
                        "_id": "id-1",
                        "content": "Quadratic solver returns NaN\nWhen a = 0",
                        "metadata": { "number": 1 },
                        "$similarity": 0.93
                    }]
                }
            })
            .to_string(),
        )
        .create_async()
        .await;
    let first_turn = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::Regex(
            r#""content":"Which issue mentions NaN\?"\}\]"#.to_string(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "choices": [{
                    "message": {
                        "role": "assistant",
                        "content": "",
                        "tool_calls": [{
                            "id": "srch00001",
                            "function": { "name": "github_search", "arguments": "{\"query\": \"NaN\"}" }
                        }]
                    },
                    "finish_reason": "tool_calls"
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;
    let second_turn = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#""role":"tool""#.to_string()),
            Matcher::Regex("Quadratic solver returns NaN".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"choices":[{"message":{"role":"assistant","content":"Issue #1 mentions NaN."},"finish_reason":"stop"}]}"#,
        )
        .create_async()
        .await;

    let app = App::connect(config(&server.url(), notes.path())).await.unwrap();
    let answer = app.answer("Which issue mentions NaN?").await.unwrap();

    assert_eq!(answer, "Issue #1 mentions NaN.");
    find.assert_async().await;
    first_turn.assert_async().await;
    second_turn.assert_async().await;
    assert!(!notes.path().join("notes.txt").exists());
}

#[tokio::test]
async fn test_connect_fails_on_rejected_collection() {
    let mut server = Server::new_async().await;
    let notes = TempDir::new().unwrap();
    let _mock = server
        .mock("POST", "/api/json/v1/default_keyspace")
        .with_status(401)
        .with_body("UNAUTHENTICATED: Invalid token")
        .create_async()
        .await;

    let err = App::connect(config(&server.url(), notes.path()))
        .await
        .err()
        .unwrap();

    assert_eq!(err.status(), Some(401));
}
