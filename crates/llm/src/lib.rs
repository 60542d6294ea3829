//! Chat model access for issuescout.
//!
//! Only what the agent loop needs: a message model that can carry tool calls
//! and a provider trait with one implementation for Mistral's hosted models.

pub mod messages;
pub mod providers;

pub use messages::{
    ChatCompletion, ChatMessage, FunctionCall, MessageRole, TokenUsage, ToolCall, ToolDefinition,
};
pub use providers::{ChatProvider, MistralProvider, ProviderId};
