use async_trait::async_trait;
use common::AssistantResult;
use std::fmt;

pub mod mistral_provider;

pub use mistral_provider::MistralProvider;

use crate::messages::{ChatCompletion, ChatMessage, ToolDefinition};

/// Provider identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProviderId {
    pub provider_type: String,
    pub model: String,
}

impl ProviderId {
    pub fn new(provider_type: &str, model: &str) -> Self {
        Self {
            provider_type: provider_type.to_string(),
            model: model.to_string(),
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.provider_type, self.model)
    }
}

/// A hosted chat model with function calling
#[async_trait]
pub trait ChatProvider: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Send the conversation and return the model's next message.
    ///
    /// `tools` may be empty, in which case the model can only answer in text.
    async fn chat(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> AssistantResult<ChatCompletion>;
}
