use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Kinds of waits the CLI shows a spinner for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressType {
    /// Reaching the vector store
    Connect,
    /// Fetching and re-embedding every issue
    Refresh,
    /// Waiting on the agent
    Thinking,
}

#[derive(Debug, Clone)]
pub struct ProgressConfig {
    pub spinner_chars: &'static str,
    pub tick_interval: Duration,
    pub color: &'static str,
    pub success_message: &'static str,
}

impl ProgressType {
    pub fn config(self) -> ProgressConfig {
        match self {
            ProgressType::Connect => ProgressConfig {
                spinner_chars: "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏",
                tick_interval: Duration::from_millis(80),
                color: "cyan",
                success_message: "Connected",
            },
            ProgressType::Refresh => ProgressConfig {
                spinner_chars: "⠋⠙⠚⠒⠂⠂⠒⠲⠴⠦⠖⠒⠐⠐⠒⠓⠋",
                tick_interval: Duration::from_millis(150),
                color: "yellow",
                success_message: "Issues updated",
            },
            ProgressType::Thinking => ProgressConfig {
                spinner_chars: "⠋⠙⠚⠞⠖⠦⠴⠲⠳⠓",
                tick_interval: Duration::from_millis(120),
                color: "blue",
                success_message: "Done",
            },
        }
    }

    /// Start a spinner on stderr. It draws nothing when stderr is not a terminal.
    pub fn create_spinner(self, message: &str) -> AdaptiveSpinner {
        let config = self.config();
        let spinner = ProgressBar::new_spinner();

        let template = format!("{{spinner:.{}}} {{msg}}", config.color);
        let progress_style = ProgressStyle::default_spinner()
            .template(&template)
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars(config.spinner_chars);

        spinner.set_style(progress_style);
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(config.tick_interval);

        AdaptiveSpinner { spinner, config }
    }
}

pub struct AdaptiveSpinner {
    spinner: ProgressBar,
    config: ProgressConfig,
}

impl AdaptiveSpinner {
    pub fn set_message(&self, message: &str) {
        self.spinner.set_message(message.to_string());
    }

    pub fn finish_success(&self, message: Option<&str>) {
        let msg = format!("✓ {}", message.unwrap_or(self.config.success_message));
        self.spinner
            .finish_with_message(style(msg).green().to_string());
    }

    pub fn finish_error(&self, message: &str) {
        let msg = format!("✗ {message}");
        self.spinner.finish_with_message(style(msg).red().to_string());
    }

    pub fn finish_and_clear(&self) {
        self.spinner.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_type_has_a_template() {
        for kind in [
            ProgressType::Connect,
            ProgressType::Refresh,
            ProgressType::Thinking,
        ] {
            let config = kind.config();
            let template = format!("{{spinner:.{}}} {{msg}}", config.color);
            assert!(ProgressStyle::default_spinner().template(&template).is_ok());
            assert!(config.spinner_chars.chars().count() > 1);
        }
    }

    #[test]
    fn test_spinner_lifecycle() {
        let spinner = ProgressType::Thinking.create_spinner("Thinking...");
        spinner.set_message("Still thinking...");
        spinner.finish_and_clear();
    }
}
