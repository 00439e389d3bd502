//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod auth;
mod console;
mod entities;
mod run;

use anyhow::Result;
use clap::{Subcommand, ValueEnum};
use ferry_console::Connection;
use ferry_core::domain::entity::EntityType;

use crate::config::Settings;

/// External system selector
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum System {
    Magento,
    Medusa,
}

impl From<System> for Connection {
    fn from(system: System) -> Self {
        match system {
            System::Magento => Connection::Magento,
            System::Medusa => Connection::Medusa,
        }
    }
}

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Interactive operator console
    Console,
    /// Test the credentials of one system
    TestAuth {
        #[arg(value_enum)]
        system: System,
    },
    /// List the entities of one type on the source system
    Entities {
        /// products, categories, customers or orders
        entity_type: EntityType,

        /// Print the raw items as JSON
        #[arg(long)]
        json: bool,
    },
    /// Start the migration with the configured defaults
    Start,
    /// Request cancellation of the running migration
    Stop,
    /// Pause the running migration
    Pause,
    /// Resume a paused migration
    Resume,
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `settings` - The CLI settings
pub async fn handle_command(command: Commands, settings: &Settings) -> Result<()> {
    match command {
        Commands::Console => console::run_console(settings).await,
        Commands::TestAuth { system } => auth::test_auth(settings, system.into()).await,
        Commands::Entities { entity_type, json } => {
            entities::list_entities(settings, entity_type, json).await
        }
        Commands::Start => run::start(settings).await,
        Commands::Stop => run::stop(settings).await,
        Commands::Pause => run::pause(settings).await,
        Commands::Resume => run::resume(settings).await,
    }
}
