//! Connection test endpoints

use crate::RunnerClient;
use crate::error::Result;
use ferry_core::domain::config::{MagentoConnection, MedusaConnection};
use ferry_core::dto::auth::AuthResponse;

impl RunnerClient {
    // =============================================================================
    // Connection Tests
    // =============================================================================

    /// Validate the source system connection
    ///
    /// # Arguments
    /// * `connection` - Magento endpoint and credentials
    ///
    /// # Returns
    /// The runner's verdict; `success: false` carries the reason
    pub async fn test_magento(&self, connection: &MagentoConnection) -> Result<AuthResponse> {
        let response = self
            .command("/api/test-magento")
            .json(connection)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Validate the target system connection
    ///
    /// # Arguments
    /// * `connection` - Medusa endpoint and credentials
    pub async fn test_medusa(&self, connection: &MedusaConnection) -> Result<AuthResponse> {
        let response = self
            .command("/api/test-medusa")
            .json(connection)
            .send()
            .await?;

        self.handle_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_magento_sends_connection_record() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/test-magento"))
            .and(body_json(json!({
                "base_url": "https://magento.test",
                "username": "admin",
                "password": "pw",
                "verify_ssl": true
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"success": true, "token": "tok-1234567890"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = RunnerClient::new(server.uri());
        let response = client
            .test_magento(&MagentoConnection {
                base_url: "https://magento.test".to_string(),
                username: "admin".to_string(),
                password: "pw".to_string(),
                verify_ssl: true,
            })
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(response.token_preview(), "tok-123456");
    }

    #[tokio::test]
    async fn test_medusa_rejection_is_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/test-medusa"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"success": false, "error": "Invalid credentials"})),
            )
            .mount(&server)
            .await;

        let client = RunnerClient::new(server.uri());
        let response = client
            .test_medusa(&MedusaConnection::default())
            .await
            .unwrap();

        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("Invalid credentials"));
    }
}
