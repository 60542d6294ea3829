use crate::progress::ProgressType;
use crate::session::Answerer;
use ai::OllamaEmbeddings;
use async_trait::async_trait;
use common::{AssistantResult, LoggingConfig};
use domain::config::AssistantConfig;
use llm::MistralProvider;
use memory::{refresh_collection, AstraVectorStore, GithubIssueSource, RefreshReport, Retriever};
use router::AgentExecutor;
use std::sync::Arc;
use tools::{NoteTool, RetrieverTool, ToolRegistry};
use tracing::info;

/// All services wired together for one run
pub struct App {
    config: AssistantConfig,
    store: Arc<AstraVectorStore>,
    source: GithubIssueSource,
    agent: AgentExecutor,
}

impl App {
    /// Build every client, then connect to the vector store.
    pub async fn connect(config: AssistantConfig) -> AssistantResult<Self> {
        let provider = Arc::new(MistralProvider::new(&config.llm)?);
        let source = GithubIssueSource::new(&config.tracker)?;
        let embeddings = Arc::new(OllamaEmbeddings::new(&config.embedding)?);

        let store = Arc::new(memory::connect(&config.vector_store, embeddings).await?);
        info!(
            "Connected to collection '{}' in keyspace '{}'",
            config.vector_store.collection,
            store.keyspace()
        );

        let mut tools = ToolRegistry::new();
        tools.register(Box::new(RetrieverTool::github_search(Retriever::new(
            store.clone(),
            config.agent.top_k,
        ))));
        tools.register(Box::new(NoteTool::new(config.notes.path.clone())));

        let agent = AgentExecutor::from_config(provider, tools, &config.agent);

        Ok(Self {
            config,
            store,
            source,
            agent,
        })
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    /// Replace the collection's contents with the repository's current issues
    pub async fn refresh(&self) -> AssistantResult<RefreshReport> {
        refresh_collection(
            &self.source,
            self.store.as_ref(),
            self.config.tracker.include_pull_requests,
        )
        .await
    }
}

/// Logging settings for a run.
///
/// Agent steps are logged by the `router` crate at `info`, so a verbose agent
/// gets that target enabled whatever the base level is.
pub fn logging_config(config: &AssistantConfig) -> LoggingConfig {
    let logging = LoggingConfig::default()
        .with_level_name(&config.logging.level)
        .with_json(config.logging.structured);

    if config.agent.verbose {
        logging.with_directive("router=info")
    } else {
        logging
    }
}

#[async_trait]
impl Answerer for App {
    async fn answer(&self, question: &str) -> AssistantResult<String> {
        let spinner = ProgressType::Thinking.create_spinner("Thinking...");
        let result = self.agent.answer(question).await;
        spinner.finish_and_clear();
        result
    }
}
