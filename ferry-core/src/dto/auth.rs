//! Connection test DTOs
//!
//! The test-auth endpoints take the connection record itself as the request
//! body, so only the response needs its own type.

use serde::{Deserialize, Serialize};

/// Response of a test-auth command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl AuthResponse {
    /// Leading part of the token, safe to echo into the operator log
    pub fn token_preview(&self) -> String {
        self.token
            .as_deref()
            .unwrap_or_default()
            .chars()
            .take(10)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_preview_truncates() {
        let response: AuthResponse =
            serde_json::from_str(r#"{"success": true, "token": "abcdefghijklmnop"}"#).unwrap();
        assert_eq!(response.token_preview(), "abcdefghij");
    }

    #[test]
    fn test_token_preview_without_token() {
        let response: AuthResponse =
            serde_json::from_str(r#"{"success": false, "error": "bad credentials"}"#).unwrap();
        assert_eq!(response.token_preview(), "");
        assert_eq!(response.error.as_deref(), Some("bad credentials"));
    }
}
