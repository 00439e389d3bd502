//! Push event DTOs
//!
//! The runner pushes events without a matching request. On the wire each
//! event is one JSON envelope per line: `{"event": "<name>", "data": {...}}`.

use serde::{Deserialize, Serialize};

/// One free-text line produced by the running job
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEvent {
    #[serde(default)]
    pub data: Option<String>,
}

/// Authoritative run state reported by the runner
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub running: bool,
    #[serde(default)]
    pub paused: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Server-initiated event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum PushEvent {
    Log(LogEvent),
    StatusUpdate(StatusUpdate),
}

impl PushEvent {
    /// Decodes one line of the event stream
    ///
    /// Blank lines are keep-alives and decode to `None`.
    pub fn decode_line(line: &str) -> serde_json::Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        serde_json::from_str(line).map(Some)
    }
}
