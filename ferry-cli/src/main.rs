//! Ferry CLI
//!
//! Operator console and one-shot commands for the migration job runner.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Settings;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ferry")]
#[command(about = "Magento to Medusa migration console", long_about = None)]
struct Cli {
    /// Job runner URL
    #[arg(long, env = "FERRY_RUNNER_URL", default_value = "http://localhost:5000")]
    runner_url: String,

    /// Deadline for each runner command in seconds (0 waits indefinitely)
    #[arg(long, env = "FERRY_REQUEST_TIMEOUT", default_value_t = 60)]
    request_timeout_secs: u64,

    /// JSON file with connection defaults and other form fields
    #[arg(long, env = "FERRY_DEFAULTS")]
    defaults: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Diagnostics go to stderr; stdout belongs to the operator
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ferry=info,ferry_console=info,ferry_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let settings = Settings::new(cli.runner_url, cli.request_timeout_secs, cli.defaults);
    settings.validate()?;
    tracing::debug!(
        "Runner at {} (command timeout: {:?})",
        settings.runner_url,
        settings.request_timeout
    );

    handle_command(cli.command, &settings).await
}
