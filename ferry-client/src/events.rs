//! Push event subscription
//!
//! The runner streams newline-delimited JSON envelopes on `/api/events`.
//! Lines are decoded in arrival order; keep-alive blank lines and lines that
//! fail to decode are skipped.

use crate::RunnerClient;
use crate::error::{ClientError, Result};
use ferry_core::dto::event::PushEvent;
use reqwest::header::ACCEPT;

impl RunnerClient {
    /// Open the runner's push event stream
    ///
    /// The command timeout does not apply here; the stream stays open for as
    /// long as the runner keeps it open.
    pub async fn subscribe_events(&self) -> Result<EventStream> {
        let url = format!("{}/api/events", self.base_url);
        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/x-ndjson")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(EventStream::new(response))
    }
}

/// Ordered reader over an open event stream
pub struct EventStream {
    response: reqwest::Response,
    buffer: Vec<u8>,
    exhausted: bool,
}

impl EventStream {
    fn new(response: reqwest::Response) -> Self {
        Self {
            response,
            buffer: Vec::new(),
            exhausted: false,
        }
    }

    /// Next decoded event, or `None` once the runner closes the stream
    pub async fn next_event(&mut self) -> Result<Option<PushEvent>> {
        loop {
            if let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = self.buffer.drain(..=pos).collect();
                if let Some(event) = decode(&line) {
                    return Ok(Some(event));
                }
                continue;
            }

            if self.exhausted {
                // A final line without a trailing newline still counts.
                let rest = std::mem::take(&mut self.buffer);
                return Ok(decode(&rest));
            }

            match self.response.chunk().await {
                Ok(Some(chunk)) => self.buffer.extend_from_slice(&chunk),
                Ok(None) => self.exhausted = true,
                Err(e) => return Err(ClientError::StreamClosed(e.to_string())),
            }
        }
    }
}

fn decode(line: &[u8]) -> Option<PushEvent> {
    let text = String::from_utf8_lossy(line);
    match PushEvent::decode_line(&text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Skipping undecodable push event ({}): {}", e, text.trim());
            None
        }
    }
}
