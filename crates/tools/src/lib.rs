//! Local functions the agent can call.
//!
//! Every tool describes itself with a [`ToolSpec`] (sent to the model as a
//! function definition) and runs on the JSON arguments the model produced.

use common::{AssistantError, AssistantResult};
use llm::ToolDefinition;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

pub mod note_tool;
pub mod retriever_tool;

pub use note_tool::NoteTool;
pub use retriever_tool::{create_retriever_tool, RetrieverTool};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    /// JSON schema of the arguments object
    pub input_schema: Value,
}

impl ToolSpec {
    /// Schema for an object with a single required string property
    pub fn single_string_argument(name: &str, description: &str) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                name: { "type": "string", "description": description }
            },
            "required": [name]
        })
    }

    pub fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.clone(),
            description: self.description.clone(),
            parameters: self.input_schema.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutput {
    pub success: bool,
    /// Text handed back to the model
    pub result: String,
    pub metadata: HashMap<String, String>,
}

impl ToolOutput {
    pub fn success(result: impl Into<String>) -> Self {
        Self {
            success: true,
            result: result.into(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: &str, value: impl ToString) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }
}

#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    fn spec(&self) -> ToolSpec;
    async fn execute(&self, args: Value) -> AssistantResult<ToolOutput>;
}

/// Read a string argument.
///
/// A bare JSON string is accepted as the value of the only argument, which is
/// what some models send for single-argument functions.
pub fn string_argument(args: &Value, key: &str) -> AssistantResult<String> {
    match args {
        Value::String(s) => Ok(s.clone()),
        Value::Object(map) => match map.get(key) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(other) => Err(AssistantError::Tool(format!(
                "argument '{}' must be a string, got {}",
                key, other
            ))),
            None => Err(AssistantError::Tool(format!("missing argument '{}'", key))),
        },
        other => Err(AssistantError::Tool(format!(
            "expected an arguments object, got {}",
            other
        ))),
    }
}

/// Tools by name, listed in registration order
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
    order: Vec<String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register under the tool's own name, replacing any tool of that name
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.spec().name;
        if self.tools.insert(name.clone(), tool).is_none() {
            self.order.push(name);
        }
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn list_tools(&self) -> Vec<ToolSpec> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|tool| tool.spec())
            .collect()
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.list_tools().iter().map(ToolSpec::to_definition).collect()
    }

    pub async fn execute(&self, name: &str, args: Value) -> AssistantResult<ToolOutput> {
        let tool = self
            .get(name)
            .ok_or_else(|| AssistantError::Tool(format!("unknown tool '{}'", name)))?;
        debug!("Executing tool {}", name);
        tool.execute(args).await
    }
}
