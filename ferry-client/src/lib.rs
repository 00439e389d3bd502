//! Ferry HTTP Client
//!
//! A small, type-safe HTTP client for the migration job runner.
//!
//! The console uses it for every outbound command (connection tests, run
//! control, entity listing) and to subscribe to the runner's push events.
//!
//! # Example
//!
//! ```no_run
//! use ferry_client::RunnerClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = RunnerClient::new("http://localhost:5000");
//!
//!     client.stop().await?;
//!     println!("Stop requested");
//!     Ok(())
//! }
//! ```

mod auth;
mod entities;
pub mod error;
mod events;
mod jobs;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use events::EventStream;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP client for the job runner API
///
/// Methods are organized into logical groups:
/// - Connection tests for both systems
/// - Run control (start, stop, pause, resume)
/// - Entity listing for the picker
/// - Push event subscription
#[derive(Debug, Clone)]
pub struct RunnerClient {
    /// Base URL of the runner (e.g., "http://localhost:5000")
    base_url: String,
    /// HTTP client instance
    client: Client,
    /// Deadline applied to request/response commands, never to the event stream
    request_timeout: Option<Duration>,
}

impl RunnerClient {
    /// Create a new runner client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the runner API (e.g., "http://localhost:5000")
    ///
    /// # Example
    /// ```
    /// use ferry_client::RunnerClient;
    ///
    /// let client = RunnerClient::new("http://localhost:5000");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new runner client with a custom HTTP client
    ///
    /// This allows you to configure proxies, TLS settings, etc.
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the runner API
    /// * `client` - A configured reqwest Client
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            request_timeout: None,
        }
    }

    /// Bound every command by `timeout`; `None` waits indefinitely
    ///
    /// # Example
    /// ```
    /// use ferry_client::RunnerClient;
    /// use std::time::Duration;
    ///
    /// let client = RunnerClient::new("http://localhost:5000")
    ///     .with_request_timeout(Some(Duration::from_secs(60)));
    /// assert_eq!(client.request_timeout(), Some(Duration::from_secs(60)));
    /// ```
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Get the base URL of the runner
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    /// Build a POST command request to `path`, applying the command timeout
    fn command(&self, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("POST {}", url);
        let request = self.client.post(&url);
        match self.request_timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        }
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response whose body is irrelevant
    ///
    /// This method checks the status code and returns an error if the request failed.
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(())
    }
}
