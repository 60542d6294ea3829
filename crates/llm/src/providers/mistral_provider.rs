use super::{ChatProvider, ProviderId};
use crate::messages::{ChatCompletion, ChatMessage, TokenUsage, ToolDefinition};
use async_trait::async_trait;
use common::{AssistantError, AssistantResult, Service};
use domain::config::LlmConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

#[derive(Debug, Clone)]
pub struct MistralProvider {
    api_key: String,
    model: String,
    endpoint: String,
    temperature: f32,
    max_tokens: Option<u32>,
    client: Client,
}

impl MistralProvider {
    pub fn new(config: &LlmConfig) -> AssistantResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AssistantError::Config("MISTRAL_API_KEY is not set".into()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AssistantError::network(Service::Llm, e))?;

        Ok(Self {
            api_key,
            model: config.model.clone(),
            endpoint: config.api_base.trim_end_matches('/').to_string(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            client,
        })
    }

    fn build_request<'a>(
        &'a self,
        messages: &'a [ChatMessage],
        tools: &[ToolDefinition],
    ) -> MistralRequest<'a> {
        let tools: Vec<Value> = tools
            .iter()
            .map(|tool| {
                json!({
                    "type": "function",
                    "function": {
                        "name": tool.name,
                        "description": tool.description,
                        "parameters": tool.parameters,
                    }
                })
            })
            .collect();

        MistralRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            tool_choice: (!tools.is_empty()).then_some("auto"),
            tools,
        }
    }
}

#[async_trait]
impl ChatProvider for MistralProvider {
    fn id(&self) -> ProviderId {
        ProviderId::new("mistral", &self.model)
    }

    async fn chat(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> AssistantResult<ChatCompletion> {
        let start_time = Instant::now();
        let request = self.build_request(messages, tools);

        debug!(
            "Sending {} messages and {} tools to Mistral (model: {})",
            messages.len(),
            tools.len(),
            self.model
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.endpoint))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AssistantError::network(Service::Llm, e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Mistral API error: {}", error_text);
            return Err(AssistantError::api(
                Service::Llm,
                Some(status.as_u16()),
                error_text,
            ));
        }

        let mistral_response: MistralResponse = response
            .json()
            .await
            .map_err(|e| AssistantError::network(Service::Llm, e))?;

        let choice = mistral_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AssistantError::api(Service::Llm, None, "Empty response from Mistral"))?;

        info!(
            "Received response from Mistral ({:?}): {} tool calls, {} tokens",
            start_time.elapsed(),
            choice.message.tool_calls.len(),
            mistral_response
                .usage
                .as_ref()
                .map(|u| u.total_tokens)
                .unwrap_or(0)
        );

        Ok(ChatCompletion {
            message: choice.message,
            finish_reason: choice.finish_reason,
            usage: mistral_response.usage,
            model: mistral_response.model.unwrap_or_else(|| self.model.clone()),
        })
    }
}

// Mistral-specific request/response types
#[derive(Debug, Serialize)]
struct MistralRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
struct MistralResponse {
    model: Option<String>,
    #[serde(default)]
    choices: Vec<MistralChoice>,
    usage: Option<TokenUsage>,
}

#[derive(Debug, Deserialize)]
struct MistralChoice {
    message: ChatMessage,
    finish_reason: Option<String>,
}
