//! Agent executor: runs the model/tool loop for one question.
//!
//! The hosted model decides which tool to call. This crate only executes the
//! calls it asks for and returns their output to it until it answers in text.

use common::{AssistantResult, RequestContext};
use domain::config::AgentConfig;
use llm::{ChatMessage, ChatProvider, ToolCall, ToolDefinition};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tools::ToolRegistry;
use tracing::{debug, info, info_span, warn, Instrument};

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant";
pub const DEFAULT_MAX_ITERATIONS: usize = 15;
pub const ITERATION_LIMIT_ANSWER: &str = "Agent stopped due to iteration limit";

/// One executed tool call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentStep {
    pub tool: String,
    pub arguments: String,
    pub observation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResponse {
    pub output: String,
    pub steps: Vec<AgentStep>,
    /// Model calls made
    pub iterations: usize,
    /// True when the loop hit `max_iterations` before a text answer
    pub stopped_early: bool,
}

pub struct AgentExecutor {
    provider: Arc<dyn ChatProvider>,
    tools: ToolRegistry,
    system_prompt: String,
    max_iterations: usize,
    verbose: bool,
}

impl AgentExecutor {
    pub fn new(provider: Arc<dyn ChatProvider>, tools: ToolRegistry) -> Self {
        Self {
            provider,
            tools,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            verbose: false,
        }
    }

    pub fn from_config(
        provider: Arc<dyn ChatProvider>,
        tools: ToolRegistry,
        config: &AgentConfig,
    ) -> Self {
        Self::new(provider, tools)
            .with_system_prompt(&config.system_prompt)
            .with_max_iterations(config.max_iterations)
            .with_verbose(config.verbose)
    }

    pub fn with_system_prompt(mut self, prompt: &str) -> Self {
        self.system_prompt = prompt.to_string();
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Answer `input` from scratch; nothing from earlier questions is sent.
    pub async fn invoke(&self, input: &str) -> AssistantResult<AgentResponse> {
        let context = RequestContext::new();
        let span = info_span!("agent", request_id = %context.request_id);

        let result = self.run(input).instrument(span).await;
        debug!(
            request_id = %context.request_id,
            elapsed_ms = context.start_time.elapsed().as_millis() as u64,
            "Agent finished"
        );
        result
    }

    async fn run(&self, input: &str) -> AssistantResult<AgentResponse> {
        let definitions: Vec<ToolDefinition> = self.tools.definitions();
        let mut messages = vec![
            ChatMessage::system(self.system_prompt.clone()),
            ChatMessage::user(input),
        ];
        let mut steps = Vec::new();

        for iteration in 1..=self.max_iterations {
            let completion = self.provider.chat(&messages, &definitions).await?;
            let message = completion.message;

            if !message.has_tool_calls() {
                return Ok(AgentResponse {
                    output: message.content,
                    steps,
                    iterations: iteration,
                    stopped_early: false,
                });
            }

            let calls = message.tool_calls.clone();
            messages.push(message);

            for call in &calls {
                let observation = self.run_tool(call).await;
                messages.push(ChatMessage::tool_result(call, observation.clone()));
                steps.push(AgentStep {
                    tool: call.function.name.clone(),
                    arguments: call.function.arguments.clone(),
                    observation,
                });
            }
        }

        warn!(
            "Agent stopped after {} iterations without an answer",
            self.max_iterations
        );
        Ok(AgentResponse {
            output: ITERATION_LIMIT_ANSWER.to_string(),
            steps,
            iterations: self.max_iterations,
            stopped_early: true,
        })
    }

    /// Run one call. Failures become the observation so the model can react.
    async fn run_tool(&self, call: &ToolCall) -> String {
        let name = &call.function.name;

        if self.verbose {
            info!("Invoking: `{}` with `{}`", name, call.function.arguments);
        } else {
            debug!("Invoking: `{}` with `{}`", name, call.function.arguments);
        }

        let observation = match call.function.parse_arguments() {
            Err(e) => format!("Invalid arguments for {}: {}", name, e),
            Ok(args) => match self.tools.execute(name, args).await {
                Ok(output) => output.result,
                Err(e) => {
                    warn!("Tool {} failed: {}", name, e);
                    format!("Error: {}", e)
                }
            },
        };

        if self.verbose {
            info!("Tool `{}` returned: {}", name, observation);
        }
        observation
    }
}
