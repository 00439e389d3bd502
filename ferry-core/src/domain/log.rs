//! Log domain types

use serde::{Deserialize, Serialize};

/// A line in the operator log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub severity: Severity,
    pub origin: LogOrigin,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Success,
    Info,
    Neutral,
    /// Dimmed default for console-originated notices
    System,
}

/// Where a log line came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOrigin {
    /// Pushed by the job runner
    Stream,
    /// Synthesized locally by the console
    System,
}
