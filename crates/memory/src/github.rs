use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{AssistantError, AssistantResult, Service};
use domain::config::TrackerConfig;
use domain::{IssueRecord, IssueSource};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info};

const USER_AGENT: &str = concat!("issuescout/", env!("CARGO_PKG_VERSION"));

/// Issues of one GitHub repository, fetched page by page from the REST API.
///
/// Pull requests come back from the same endpoint; they are returned with
/// `is_pull_request` set so callers can decide what to do with them.
pub struct GithubIssueSource {
    client: reqwest::Client,
    api_base: String,
    owner: String,
    repo: String,
    token: Option<String>,
    state: String,
    per_page: u32,
    max_pages: u32,
}

#[derive(Debug, Deserialize)]
struct GithubIssue {
    number: u64,
    title: String,
    body: Option<String>,
    html_url: String,
    state: String,
    user: Option<GithubUser>,
    #[serde(default)]
    comments: u64,
    #[serde(default)]
    labels: Vec<GithubLabel>,
    created_at: DateTime<Utc>,
    pull_request: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct GithubUser {
    login: String,
}

#[derive(Debug, Deserialize)]
struct GithubLabel {
    name: String,
}

impl From<GithubIssue> for IssueRecord {
    fn from(issue: GithubIssue) -> Self {
        IssueRecord {
            number: issue.number,
            title: issue.title,
            body: issue.body,
            url: issue.html_url,
            state: issue.state,
            author: issue.user.map(|u| u.login).unwrap_or_default(),
            comments: issue.comments,
            labels: issue.labels.into_iter().map(|l| l.name).collect(),
            created_at: issue.created_at,
            is_pull_request: issue.pull_request.is_some(),
        }
    }
}

impl GithubIssueSource {
    pub fn new(config: &TrackerConfig) -> AssistantResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AssistantError::network(Service::IssueTracker, e))?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            owner: config.owner.clone(),
            repo: config.repo.clone(),
            token: config.token.clone(),
            state: config.state.clone(),
            per_page: config.per_page.clamp(1, 100),
            max_pages: config.max_pages.max(1),
        })
    }

    async fn fetch_page(&self, page: u32) -> AssistantResult<Vec<GithubIssue>> {
        let url = format!("{}/repos/{}/{}/issues", self.api_base, self.owner, self.repo);

        let mut request = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github+json")
            .query(&[
                ("state", self.state.clone()),
                ("per_page", self.per_page.to_string()),
                ("page", page.to_string()),
            ]);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AssistantError::network(Service::IssueTracker, e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(
                "Fetching issues of {} failed with {}: {}",
                self.describe(),
                status,
                error_text
            );
            return Err(AssistantError::api(
                Service::IssueTracker,
                Some(status.as_u16()),
                error_text,
            ));
        }

        response
            .json()
            .await
            .map_err(|e| AssistantError::network(Service::IssueTracker, e))
    }
}

#[async_trait]
impl IssueSource for GithubIssueSource {
    async fn fetch_issues(&self) -> AssistantResult<Vec<IssueRecord>> {
        let mut records = Vec::new();

        for page in 1..=self.max_pages {
            let items = self.fetch_page(page).await?;
            let count = items.len();
            debug!("Page {} of {} returned {} items", page, self.describe(), count);

            records.extend(items.into_iter().map(IssueRecord::from));

            if count < self.per_page as usize {
                break;
            }
        }

        info!("Fetched {} items from {}", records.len(), self.describe());
        Ok(records)
    }

    fn describe(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}
