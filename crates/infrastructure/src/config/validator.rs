use anyhow::{bail, Result};
use domain::config::*;
use tracing::warn;

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, config: &AssistantConfig) -> Result<()> {
        self.validate_tracker_config(&config.tracker)?;
        self.validate_vector_store_config(&config.vector_store)?;
        self.validate_embedding_config(&config.embedding)?;
        self.validate_llm_config(&config.llm)?;
        self.validate_agent_config(&config.agent)?;
        self.validate_logging_config(&config.logging)?;
        Ok(())
    }

    fn validate_tracker_config(&self, config: &TrackerConfig) -> Result<()> {
        if config.owner.trim().is_empty() || config.repo.trim().is_empty() {
            bail!("Repository owner and name must both be set");
        }

        let valid_states = ["open", "closed", "all"];
        if !valid_states.contains(&config.state.as_str()) {
            bail!(
                "Invalid issue state '{}'. Must be one of: {:?}",
                config.state,
                valid_states
            );
        }

        if !(1..=100).contains(&config.per_page) {
            bail!("per_page must be between 1 and 100, got {}", config.per_page);
        }

        if config.max_pages == 0 {
            bail!("max_pages must be greater than 0");
        }

        if config.token.is_none() {
            warn!("GITHUB_TOKEN not set, issue fetches are rate limited");
        }

        Ok(())
    }

    fn validate_vector_store_config(&self, config: &VectorStoreConfig) -> Result<()> {
        match config.api_endpoint.as_deref() {
            None => bail!("ASTRA_DB_API_ENDPOINT is not set"),
            Some(endpoint) if !endpoint.starts_with("http") => {
                bail!("Vector store endpoint must be an http(s) URL, got '{}'", endpoint)
            }
            _ => {}
        }

        if config.token.is_none() {
            bail!("ASTRA_DB_APPLICATION_TOKEN is not set");
        }

        if config.collection.trim().is_empty() {
            bail!("Collection name cannot be empty");
        }

        if config.insert_batch_size == 0 || config.insert_batch_size > MAX_INSERT_BATCH_SIZE {
            bail!(
                "insert_batch_size must be between 1 and {}, got {}",
                MAX_INSERT_BATCH_SIZE,
                config.insert_batch_size
            );
        }

        Ok(())
    }

    fn validate_embedding_config(&self, config: &EmbeddingConfig) -> Result<()> {
        if config.dimension == 0 {
            bail!("Embedding dimension must be greater than 0");
        }
        if config.batch_size == 0 {
            bail!("Embedding batch size must be greater than 0");
        }
        if config.model.trim().is_empty() {
            bail!("Embedding model cannot be empty");
        }
        Ok(())
    }

    fn validate_llm_config(&self, config: &LlmConfig) -> Result<()> {
        if config.api_key.is_none() {
            bail!("MISTRAL_API_KEY is not set");
        }

        if !(0.0..=2.0).contains(&config.temperature) {
            bail!(
                "Temperature must be between 0.0 and 2.0, got {}",
                config.temperature
            );
        }

        if config.max_tokens == Some(0) {
            bail!("max_tokens must be greater than 0");
        }

        Ok(())
    }

    fn validate_agent_config(&self, config: &AgentConfig) -> Result<()> {
        if config.top_k == 0 {
            bail!("top_k must be greater than 0");
        }
        if config.max_iterations == 0 {
            bail!("max_iterations must be greater than 0");
        }
        Ok(())
    }

    fn validate_logging_config(&self, config: &LoggingConfig) -> Result<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&config.level.to_lowercase().as_str()) {
            bail!(
                "Invalid log level '{}'. Must be one of: {:?}",
                config.level,
                valid_levels
            );
        }
        Ok(())
    }
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}
