use crate::{string_argument, Tool, ToolOutput, ToolSpec};
use async_trait::async_trait;
use common::AssistantResult;
use memory::Retriever;
use serde_json::Value;

pub const GITHUB_SEARCH_NAME: &str = "github_search";
pub const GITHUB_SEARCH_DESCRIPTION: &str = "Search for information about github issues. For any questions about github issues, you must use this tool!";

/// Exposes a retriever to the model as a search function.
///
/// The result is the content of every retrieved document, separated by a
/// blank line. An empty result set yields an empty string.
pub struct RetrieverTool {
    retriever: Retriever,
    name: String,
    description: String,
}

pub fn create_retriever_tool(
    retriever: Retriever,
    name: impl Into<String>,
    description: impl Into<String>,
) -> RetrieverTool {
    RetrieverTool {
        retriever,
        name: name.into(),
        description: description.into(),
    }
}

impl RetrieverTool {
    pub fn github_search(retriever: Retriever) -> Self {
        create_retriever_tool(retriever, GITHUB_SEARCH_NAME, GITHUB_SEARCH_DESCRIPTION)
    }
}

#[async_trait]
impl Tool for RetrieverTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name.clone(),
            description: self.description.clone(),
            input_schema: ToolSpec::single_string_argument("query", "query to look up in retriever"),
        }
    }

    async fn execute(&self, args: Value) -> AssistantResult<ToolOutput> {
        let query = string_argument(&args, "query")?;
        let documents = self.retriever.relevant_documents(&query).await?;

        let content = documents
            .iter()
            .map(|d| d.page_content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        Ok(ToolOutput::success(content).with_metadata("documents", documents.len()))
    }
}
