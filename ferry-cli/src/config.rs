//! Configuration module
//!
//! Handles CLI settings: where the runner lives, how long commands may take,
//! and where operator defaults are read from.

use anyhow::Result;
use ferry_client::RunnerClient;
use ferry_console::ConsoleForm;
use std::path::PathBuf;
use std::time::Duration;

/// CLI settings
#[derive(Debug, Clone)]
pub struct Settings {
    /// Job runner base URL (e.g., "http://localhost:5000")
    pub runner_url: String,

    /// Deadline for each command; `None` waits indefinitely
    pub request_timeout: Option<Duration>,

    /// Optional JSON file pre-filling the operator form
    pub defaults: Option<PathBuf>,
}

impl Settings {
    /// Creates settings; a timeout of zero seconds disables the deadline
    pub fn new(runner_url: String, request_timeout_secs: u64, defaults: Option<PathBuf>) -> Self {
        Self {
            runner_url,
            request_timeout: (request_timeout_secs > 0)
                .then(|| Duration::from_secs(request_timeout_secs)),
            defaults,
        }
    }

    /// Validates the settings
    pub fn validate(&self) -> Result<()> {
        if self.runner_url.is_empty() {
            anyhow::bail!("runner_url cannot be empty");
        }

        if !self.runner_url.starts_with("http://") && !self.runner_url.starts_with("https://") {
            anyhow::bail!("runner_url must start with http:// or https://");
        }

        Ok(())
    }

    /// Runner client with the configured command deadline
    pub fn client(&self) -> RunnerClient {
        RunnerClient::new(&self.runner_url).with_request_timeout(self.request_timeout)
    }

    /// Operator form, pre-filled from the defaults file when one is set
    pub fn load_form(&self) -> Result<ConsoleForm> {
        match &self.defaults {
            Some(path) => {
                tracing::debug!("Loading console defaults from {}", path.display());
                ConsoleForm::from_json_file(path)
            }
            None => {
                tracing::debug!("No defaults file, starting with an empty form");
                Ok(ConsoleForm::default())
            }
        }
    }
}
