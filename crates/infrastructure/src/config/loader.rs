use anyhow::{bail, Context, Result};
use domain::config::*;
use std::env;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    File(PathBuf),
    Default,
}

/// A config file on the search path that exists but could not be used
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedConfig {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of [`ConfigLoader::load`].
///
/// Loading runs before logging is set up, so files that were skipped are
/// returned here for the caller to report.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: AssistantConfig,
    pub source: ConfigSource,
    pub skipped: Vec<SkippedConfig>,
}

pub struct ConfigLoader {
    config_paths: Vec<PathBuf>,
    explicit_path: Option<PathBuf>,
    env_prefix: String,
    load_dotenv: bool,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            config_paths: Self::default_config_paths(),
            explicit_path: None,
            env_prefix: "ISSUESCOUT_".to_string(),
            load_dotenv: true,
        }
    }

    /// Use exactly this file. Loading fails if it does not exist.
    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.explicit_path = Some(path);
        self
    }

    pub fn with_search_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.config_paths = paths;
        self
    }

    pub fn with_env_prefix(mut self, prefix: String) -> Self {
        self.env_prefix = prefix;
        self
    }

    pub fn without_dotenv(mut self) -> Self {
        self.load_dotenv = false;
        self
    }

    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".issuescoutrc.toml"),
            PathBuf::from("issuescout.toml"),
            PathBuf::from("issuescout.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("issuescout").join("config.toml"));
        }

        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".config").join("issuescout").join("config.toml"));
        }

        paths
    }

    /// Defaults, then the first config file found, then the process environment.
    pub async fn load(&self) -> Result<LoadedConfig> {
        if self.load_dotenv {
            if let Ok(path) = dotenv::dotenv() {
                debug!("Loaded environment from {}", path.display());
            }
        }

        let mut loaded = self.load_file_config().await?;
        loaded.config = self.apply_env_overrides(loaded.config, |key| env::var(key).ok());
        Ok(loaded)
    }

    async fn load_file_config(&self) -> Result<LoadedConfig> {
        if let Some(path) = &self.explicit_path {
            if !path.exists() {
                bail!("Config file not found: {}", path.display());
            }
            let config = self
                .load_file(path)
                .await
                .with_context(|| format!("Invalid config file {}", path.display()))?;
            return Ok(LoadedConfig {
                config,
                source: ConfigSource::File(path.clone()),
                skipped: Vec::new(),
            });
        }

        let mut skipped = Vec::new();
        for path in &self.config_paths {
            if !path.exists() {
                continue;
            }
            match self.load_file(path).await {
                Ok(config) => {
                    return Ok(LoadedConfig {
                        config,
                        source: ConfigSource::File(path.clone()),
                        skipped,
                    });
                }
                Err(e) => skipped.push(SkippedConfig {
                    path: path.clone(),
                    reason: format!("{:#}", e),
                }),
            }
        }

        Ok(LoadedConfig {
            config: AssistantConfig::default(),
            source: ConfigSource::Default,
            skipped,
        })
    }

    async fn load_file(&self, path: &Path) -> Result<AssistantConfig> {
        let content = fs::read_to_string(path)
            .await
            .context("Failed to read config file")?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        match extension {
            "toml" | "" => toml::from_str(&content).context("Failed to parse TOML config"),
            "json" => serde_json::from_str(&content).context("Failed to parse JSON config"),
            _ => toml::from_str(&content)
                .or_else(|_| serde_json::from_str(&content))
                .context("Failed to parse config file"),
        }
    }

    /// Apply environment overrides read through `lookup`.
    ///
    /// Credentials use the names the services document (`ASTRA_DB_*`,
    /// `MISTRAL_API_KEY`, `GITHUB_TOKEN`, `OLLAMA_URL`); everything else uses
    /// the loader prefix.
    pub fn apply_env_overrides<F>(&self, mut config: AssistantConfig, lookup: F) -> AssistantConfig
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let prefixed = |name: &str| non_empty(&format!("{}{}", self.env_prefix, name));

        // Vector store
        if let Some(endpoint) = non_empty("ASTRA_DB_API_ENDPOINT") {
            config.vector_store.api_endpoint = Some(endpoint);
        }
        if let Some(token) = non_empty("ASTRA_DB_APPLICATION_TOKEN") {
            config.vector_store.token = Some(token);
        }
        if let Some(keyspace) = non_empty("ASTRA_DB_KEYSPACE") {
            config.vector_store.keyspace = Some(keyspace);
        }
        if let Some(collection) = prefixed("COLLECTION") {
            config.vector_store.collection = collection;
        }

        // LLM
        if let Some(api_key) = non_empty("MISTRAL_API_KEY") {
            config.llm.api_key = Some(api_key);
        }
        if let Some(model) = prefixed("LLM_MODEL") {
            config.llm.model = model;
        }

        // Embeddings
        if let Some(url) = non_empty("OLLAMA_URL") {
            config.embedding.url = url;
        }
        if let Some(model) = prefixed("EMBEDDING_MODEL") {
            config.embedding.model = model;
        }

        // Issue tracker
        if let Some(token) = non_empty("GITHUB_TOKEN") {
            config.tracker.token = Some(token);
        }
        if let Some(owner) = prefixed("OWNER") {
            config.tracker.owner = owner;
        }
        if let Some(repo) = prefixed("REPO") {
            config.tracker.repo = repo;
        }

        // Agent
        if let Some(top_k) = prefixed("TOP_K") {
            match top_k.parse() {
                Ok(k) => config.agent.top_k = k,
                Err(_) => warn!("Ignoring non-numeric {}TOP_K: {}", self.env_prefix, top_k),
            }
        }
        if let Some(notes) = prefixed("NOTES_FILE") {
            config.notes.path = PathBuf::from(notes);
        }

        // Logging
        if let Some(level) = prefixed("LOG_LEVEL") {
            config.logging.level = level;
        }

        config
    }

    /// Example config without credentials, which belong in the environment.
    pub fn generate_example_config() -> String {
        toml::to_string_pretty(&AssistantConfig::default())
            .unwrap_or_else(|_| "Failed to generate example config".to_string())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_credentials_from_service_variables() {
        let loader = ConfigLoader::new();
        let config = loader.apply_env_overrides(
            AssistantConfig::default(),
            lookup(&[
                ("ASTRA_DB_API_ENDPOINT", "https://db-id-region.apps.astra.datastax.com"),
                ("ASTRA_DB_APPLICATION_TOKEN", "AstraCS:abc"),
                ("MISTRAL_API_KEY", "mk-123"),
                ("GITHUB_TOKEN", "ghp_456"),
            ]),
        );

        assert_eq!(
            config.vector_store.api_endpoint.as_deref(),
            Some("https://db-id-region.apps.astra.datastax.com")
        );
        assert_eq!(config.vector_store.token.as_deref(), Some("AstraCS:abc"));
        assert_eq!(config.vector_store.keyspace, None);
        assert_eq!(config.llm.api_key.as_deref(), Some("mk-123"));
        assert_eq!(config.tracker.token.as_deref(), Some("ghp_456"));
    }

    #[test]
    fn test_prefixed_overrides() {
        let loader = ConfigLoader::new();
        let config = loader.apply_env_overrides(
            AssistantConfig::default(),
            lookup(&[
                ("ISSUESCOUT_OWNER", "tokio-rs"),
                ("ISSUESCOUT_REPO", "tokio"),
                ("ISSUESCOUT_TOP_K", "5"),
                ("ISSUESCOUT_NOTES_FILE", "/tmp/n.txt"),
                ("ISSUESCOUT_LOG_LEVEL", "debug"),
            ]),
        );

        assert_eq!(config.tracker.owner, "tokio-rs");
        assert_eq!(config.tracker.repo, "tokio");
        assert_eq!(config.agent.top_k, 5);
        assert_eq!(config.notes.path, PathBuf::from("/tmp/n.txt"));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_blank_and_invalid_values_ignored() {
        let loader = ConfigLoader::new();
        let config = loader.apply_env_overrides(
            AssistantConfig::default(),
            lookup(&[("ASTRA_DB_KEYSPACE", ""), ("ISSUESCOUT_TOP_K", "three")]),
        );

        assert_eq!(config.vector_store.keyspace, None);
        assert_eq!(config.agent.top_k, 3);
    }

    #[test]
    fn test_custom_prefix() {
        let loader = ConfigLoader::new().with_env_prefix("SCOUT_".to_string());
        let config = loader.apply_env_overrides(
            AssistantConfig::default(),
            lookup(&[("SCOUT_REPO", "serde"), ("ISSUESCOUT_REPO", "ignored")]),
        );
        assert_eq!(config.tracker.repo, "serde");
    }

    #[test]
    fn test_example_config_has_no_secrets() {
        let example = ConfigLoader::generate_example_config();
        assert!(example.contains("[vector_store]"));
        assert!(example.contains("collection = \"github\""));
        assert!(!example.contains("token"));
        assert!(!example.contains("api_key"));
    }
}
