//! Run-control command DTOs

use serde::{Deserialize, Serialize};

/// Acknowledgment of a start/pause/resume command
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl CommandResponse {
    /// The server's reason when the command was rejected
    pub fn rejection(&self) -> Option<&str> {
        if self.success {
            None
        } else {
            Some(self.error.as_deref().unwrap_or("Unknown error"))
        }
    }
}
