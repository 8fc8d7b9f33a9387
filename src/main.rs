use clap::Parser;
use promptrank::cli::run_command;
use promptrank::cli::Cli;
use promptrank::AppConfig;
use promptrank::PromptRank;
use promptrank::Result;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::load()?,
    };

    // Initialize logging
    if cli.verbose {
        promptrank::logging::init_logging_with_level("debug")?;
    } else {
        promptrank::logging::init_logging_with_config(Some(&config))?;
    }
    info!("Configuration loaded successfully");

    let app = PromptRank::new(config);
    run_command(&app, cli.command, cli.snapshot.as_deref(), cli.json).await
}
