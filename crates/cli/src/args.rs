use clap::{Parser, Subcommand};
use domain::config::AssistantConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "issuescout")]
#[command(about = "Ask questions about a GitHub repository's issues")]
#[command(version)]
pub struct Cli {
    /// Config file to use instead of the search path
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Repository owner
    #[arg(long, global = true)]
    pub owner: Option<String>,

    /// Repository name
    #[arg(long, global = true)]
    pub repo: Option<String>,

    /// Refresh the issue collection without asking
    #[arg(long, global = true, conflicts_with = "no_update")]
    pub update: bool,

    /// Keep the issue collection as it is without asking
    #[arg(long, global = true)]
    pub no_update: bool,

    /// File that save_note appends to
    #[arg(long, global = true, value_name = "PATH")]
    pub notes: Option<PathBuf>,

    /// Log agent steps and tool calls
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Answer a single question and exit
    Ask {
        /// The question
        question: String,
    },
    /// Print an example config file
    Config,
}

impl Cli {
    /// Flags win over config files and the environment
    pub fn apply_overrides(&self, config: &mut AssistantConfig) {
        if let Some(owner) = &self.owner {
            config.tracker.owner = owner.clone();
        }
        if let Some(repo) = &self.repo {
            config.tracker.repo = repo.clone();
        }
        if let Some(notes) = &self.notes {
            config.notes.path = notes.clone();
        }
        if self.verbose {
            config.agent.verbose = true;
            config.logging.level = "info".to_string();
        }
        if self.json_logs {
            config.logging.structured = true;
        }
    }

    /// `Some` when a flag already decided whether to refresh
    pub fn update_decision(&self) -> Option<bool> {
        if self.update {
            Some(true)
        } else if self.no_update {
            Some(false)
        } else {
            None
        }
    }
}
