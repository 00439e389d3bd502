//! Run-control commands
//!
//! One-shot versions of the console's Start/Stop/Pause/Resume. The runner
//! reports the resulting state on its event stream, which these commands do
//! not follow; use `ferry console` to watch a run.

use anyhow::Result;
use colored::*;
use ferry_console::validate_ready;
use ferry_core::dto::command::CommandResponse;

use crate::config::Settings;

/// Start the migration with the configuration from the defaults file
pub async fn start(settings: &Settings) -> Result<()> {
    let config = settings.load_form()?.gather();
    validate_ready(&config)?;

    let response = settings.client().start(&config).await?;
    accepted(&response)?;

    println!("{}", "✓ Start accepted by the job runner".green().bold());
    println!(
        "  Entities: {}",
        config
            .entities
            .iter()
            .map(|e| e.as_str())
            .collect::<Vec<_>>()
            .join(", ")
            .cyan()
    );
    if config.dry_run {
        println!("  {}", "Dry run: nothing will be written to Medusa".yellow());
    }
    Ok(())
}

/// Request cancellation of the running migration
pub async fn stop(settings: &Settings) -> Result<()> {
    settings.client().stop().await?;
    println!("{}", "Stop command sent...".yellow());
    Ok(())
}

pub async fn pause(settings: &Settings) -> Result<()> {
    let response = settings.client().pause().await?;
    accepted(&response)?;
    println!("{}", "Pause command sent...".yellow());
    Ok(())
}

pub async fn resume(settings: &Settings) -> Result<()> {
    let response = settings.client().resume().await?;
    accepted(&response)?;
    println!("{}", "Resume command sent...".cyan());
    Ok(())
}

fn accepted(response: &CommandResponse) -> Result<()> {
    match response.rejection() {
        Some(reason) => anyhow::bail!("{}", reason),
        None => Ok(()),
    }
}
