use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration for issuescout
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AssistantConfig {
    #[serde(default)]
    pub tracker: TrackerConfig,

    #[serde(default)]
    pub vector_store: VectorStoreConfig,

    #[serde(default)]
    pub embedding: EmbeddingConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub agent: AgentConfig,

    #[serde(default)]
    pub notes: NotesConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// GitHub repository whose issues are indexed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default = "default_owner")]
    pub owner: String,

    #[serde(default = "default_repo")]
    pub repo: String,

    #[serde(default = "default_github_api")]
    pub api_base: String,

    /// Personal access token; anonymous requests are rate limited to 60/hour
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// `open`, `closed` or `all`
    #[serde(default = "default_issue_state")]
    pub state: String,

    #[serde(default = "default_per_page")]
    pub per_page: u32,

    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// The issues endpoint also returns pull requests
    #[serde(default)]
    pub include_pull_requests: bool,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Astra DB Data API collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorStoreConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_endpoint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Falls back to `default_keyspace` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyspace: Option<String>,

    #[serde(default = "default_collection")]
    pub collection: String,

    /// `insertMany` accepts at most 20 documents per call
    #[serde(default = "default_insert_batch_size")]
    pub insert_batch_size: usize,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Ollama embedding model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default = "default_ollama_url")]
    pub url: String,

    #[serde(default = "default_embedding_model")]
    pub model: String,

    #[serde(default = "default_embedding_dimension")]
    pub dimension: usize,

    #[serde(default = "default_embedding_batch_size")]
    pub batch_size: usize,

    #[serde(default = "default_embedding_timeout_secs")]
    pub timeout_secs: u64,
}

/// Hosted chat model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_mistral_api")]
    pub api_base: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_llm_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Documents returned by `github_search`
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Log every tool call and its output
    #[serde(default = "default_verbose")]
    pub verbose: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotesConfig {
    #[serde(default = "default_notes_path")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// One JSON object per line instead of the human format
    #[serde(default)]
    pub structured: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            owner: default_owner(),
            repo: default_repo(),
            api_base: default_github_api(),
            token: None,
            state: default_issue_state(),
            per_page: default_per_page(),
            max_pages: default_max_pages(),
            include_pull_requests: false,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            api_endpoint: None,
            token: None,
            keyspace: None,
            collection: default_collection(),
            insert_batch_size: default_insert_batch_size(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl VectorStoreConfig {
    pub fn keyspace_or_default(&self) -> &str {
        self.keyspace
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .unwrap_or(DEFAULT_KEYSPACE)
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            url: default_ollama_url(),
            model: default_embedding_model(),
            dimension: default_embedding_dimension(),
            batch_size: default_embedding_batch_size(),
            timeout_secs: default_embedding_timeout_secs(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: default_mistral_api(),
            api_key: None,
            model: default_llm_model(),
            temperature: default_temperature(),
            max_tokens: None,
            timeout_secs: default_llm_timeout_secs(),
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            top_k: default_top_k(),
            max_iterations: default_max_iterations(),
            verbose: default_verbose(),
        }
    }
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            path: default_notes_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            structured: false,
        }
    }
}

pub const DEFAULT_KEYSPACE: &str = "default_keyspace";

/// Service limit of the Data API `insertMany` command
pub const MAX_INSERT_BATCH_SIZE: usize = 20;

fn default_owner() -> String {
    "Abhi8149".to_string()
}

fn default_repo() -> String {
    "Simple-Math-Equation-Solver".to_string()
}

fn default_github_api() -> String {
    "https://api.github.com".to_string()
}

fn default_issue_state() -> String {
    "open".to_string()
}

fn default_per_page() -> u32 {
    100
}

fn default_max_pages() -> u32 {
    10
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_collection() -> String {
    "github".to_string()
}

fn default_insert_batch_size() -> usize {
    MAX_INSERT_BATCH_SIZE
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_embedding_model() -> String {
    "nomic-embed-text".to_string()
}

fn default_embedding_dimension() -> usize {
    768
}

fn default_embedding_batch_size() -> usize {
    32
}

fn default_embedding_timeout_secs() -> u64 {
    60
}

fn default_mistral_api() -> String {
    "https://api.mistral.ai/v1".to_string()
}

fn default_llm_model() -> String {
    "mistral-small-latest".to_string()
}

fn default_temperature() -> f32 {
    0.1
}

fn default_llm_timeout_secs() -> u64 {
    120
}

fn default_system_prompt() -> String {
    "You are a helpful assistant".to_string()
}

fn default_top_k() -> usize {
    3
}

fn default_max_iterations() -> usize {
    15
}

fn default_verbose() -> bool {
    true
}

fn default_notes_path() -> PathBuf {
    PathBuf::from("notes.txt")
}

fn default_log_level() -> String {
    "warn".to_string()
}
