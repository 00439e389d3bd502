//! Connection test command

use anyhow::Result;
use colored::*;
use ferry_console::Connection;

use crate::config::Settings;

/// Test one system's credentials from the configured defaults
pub async fn test_auth(settings: &Settings, connection: Connection) -> Result<()> {
    let form = settings.load_form()?;
    let client = settings.client();

    let response = match connection {
        Connection::Magento => client.test_magento(&form.magento).await,
        Connection::Medusa => client.test_medusa(&form.medusa).await,
    }
    .map_err(|e| anyhow::anyhow!("Network error: {}", e))?;

    if !response.success {
        anyhow::bail!(
            "Authentication failed: {}",
            response.error.as_deref().unwrap_or("Unknown error")
        );
    }

    println!(
        "{}",
        format!(
            "✓ {} Authentication successful! Token: {}...",
            connection,
            response.token_preview()
        )
        .green()
        .bold()
    );
    Ok(())
}
