use anyhow::{Context, Result};
use clap::Parser;
use common::init_structured_logging;
use console::style;
use infrastructure::{ConfigLoader, ConfigSource, ConfigValidator};
use issuescout::progress::ProgressType;
use issuescout::session::{ask_update, question_loop};
use issuescout::app::logging_config;
use issuescout::{Answerer, App, Cli, Commands};
use std::io::{self, Write};
use tracing::{debug, info, warn};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    if cli.command == Some(Commands::Config) {
        println!("{}", ConfigLoader::generate_example_config());
        return Ok(());
    }

    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_path(path.clone());
    }
    let loaded = loader.load().await.context("Failed to load configuration")?;
    let mut config = loaded.config;
    cli.apply_overrides(&mut config);

    init_structured_logging(logging_config(&config))?;
    for skipped in &loaded.skipped {
        warn!(
            "Skipped config file {}: {}",
            skipped.path.display(),
            skipped.reason
        );
    }
    match &loaded.source {
        ConfigSource::File(path) => info!("Using configuration from {}", path.display()),
        ConfigSource::Default => debug!("Using built-in configuration"),
    }

    ConfigValidator::new()
        .validate(&config)
        .context("Invalid configuration")?;

    let spinner = ProgressType::Connect.create_spinner("Connecting to the vector store...");
    let app = match App::connect(config).await {
        Ok(app) => {
            spinner.finish_and_clear();
            app
        }
        Err(e) => {
            spinner.finish_error("Could not connect");
            return Err(e).context("Failed to set up services");
        }
    };

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    let update = match cli.update_decision() {
        Some(decision) => decision,
        None if matches!(cli.command, Some(Commands::Ask { .. })) => false,
        None => ask_update(&mut input, &mut output)?,
    };
    if update {
        refresh(&app).await?;
    }

    match cli.command {
        Some(Commands::Ask { question }) => {
            let answer = app.answer(&question).await?;
            writeln!(output, "{}", answer)?;
        }
        _ => {
            let summary = question_loop(&mut input, &mut output, &app).await?;
            debug!(
                answered = summary.answered,
                failed = summary.failed,
                "Session finished"
            );
        }
    }

    Ok(())
}

async fn refresh(app: &App) -> Result<()> {
    let tracker = &app.config().tracker;
    let spinner = ProgressType::Refresh.create_spinner(&format!(
        "Fetching issues of {}/{}...",
        tracker.owner, tracker.repo
    ));

    match app.refresh().await {
        Ok(report) => {
            spinner.finish_success(Some(&format!(
                "Stored {} issues ({} pull requests skipped)",
                report.inserted, report.skipped_pull_requests
            )));
            Ok(())
        }
        Err(e) => {
            spinner.finish_error("Update failed");
            Err(e).context("Failed to update the issue collection")
        }
    }
}
