use crate::{string_argument, Tool, ToolOutput, ToolSpec};
use async_trait::async_trait;
use common::AssistantResult;
use serde_json::Value;
use std::path::PathBuf;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::info;

pub const SAVE_NOTE_NAME: &str = "save_note";
pub const SAVE_NOTE_DESCRIPTION: &str = "Save a note to a local file along with the heading of note";

/// Appends notes to a text file, one per line.
///
/// The file is created when missing and never truncated.
pub struct NoteTool {
    path: PathBuf,
}

impl NoteTool {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub async fn append(&self, note: &str) -> AssistantResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(format!("{}\n", note).as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl Tool for NoteTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: SAVE_NOTE_NAME.to_string(),
            description: SAVE_NOTE_DESCRIPTION.to_string(),
            input_schema: ToolSpec::single_string_argument("note", "the note to save"),
        }
    }

    async fn execute(&self, args: Value) -> AssistantResult<ToolOutput> {
        let note = string_argument(&args, "note")?;
        self.append(&note).await?;
        info!("Saved note to {}", self.path.display());

        Ok(
            ToolOutput::success(format!("Note saved to {}", self.path.display()))
                .with_metadata("bytes", note.len() + 1),
        )
    }
}
