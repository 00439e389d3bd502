//! Run-control endpoints

use crate::RunnerClient;
use crate::error::Result;
use ferry_core::domain::config::JobConfiguration;
use ferry_core::dto::command::CommandResponse;

impl RunnerClient {
    // =============================================================================
    // Run Control
    // =============================================================================

    /// Launch the migration with the full job configuration
    ///
    /// An accepted start does not mean the job is running yet; the runner
    /// reports that through a status push.
    ///
    /// # Arguments
    /// * `config` - The configuration gathered from the operator's input
    pub async fn start(&self, config: &JobConfiguration) -> Result<CommandResponse> {
        let response = self.command("/api/start").json(config).send().await?;

        self.handle_response(response).await
    }

    /// Request cancellation of the running job
    ///
    /// Fire-and-forget: the response body is ignored.
    pub async fn stop(&self) -> Result<()> {
        let response = self.command("/api/stop").send().await?;

        self.handle_empty_response(response).await
    }

    /// Ask the running job to pause between records
    pub async fn pause(&self) -> Result<CommandResponse> {
        let response = self.command("/api/pause").send().await?;

        self.handle_response(response).await
    }

    /// Resume a paused job
    pub async fn resume(&self) -> Result<CommandResponse> {
        let response = self.command("/api/resume").send().await?;

        self.handle_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientError;
    use ferry_core::domain::config::{MAX_WORKERS, MagentoConnection, MedusaConnection};
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config() -> JobConfiguration {
        JobConfiguration {
            magento: MagentoConnection {
                base_url: "https://magento.test".to_string(),
                username: "admin".to_string(),
                ..Default::default()
            },
            medusa: MedusaConnection {
                base_url: "http://localhost:9000".to_string(),
                email: "admin@example.com".to_string(),
                ..Default::default()
            },
            entities: vec![],
            limit: "5".to_string(),
            product_ids: String::new(),
            category_ids: String::new(),
            customer_ids: String::new(),
            order_ids: "100, 101".to_string(),
            dry_run: true,
            finalize_orders: false,
            migrate_invoices: false,
            migrate_payments: false,
            rollback_on_finalize_fail: false,
            delta_migration: false,
            delta_from_date: None,
            max_workers: MAX_WORKERS,
        }
    }

    #[tokio::test]
    async fn test_start_posts_configuration() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/start"))
            .and(body_partial_json(json!({
                "limit": "5",
                "order_ids": "100, 101",
                "dry_run": true,
                "max_workers": 10
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;

        let client = RunnerClient::new(server.uri());
        let response = client.start(&config()).await.unwrap();

        assert!(response.success);
    }

    #[tokio::test]
    async fn test_start_rejection_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/start"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"success": false, "error": "Please authenticate both Magento and Medusa first."}),
            ))
            .mount(&server)
            .await;

        let client = RunnerClient::new(server.uri());
        let response = client.start(&config()).await.unwrap();

        assert_eq!(
            response.rejection(),
            Some("Please authenticate both Magento and Medusa first.")
        );
    }

    #[tokio::test]
    async fn test_stop_ignores_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/stop"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .expect(1)
            .mount(&server)
            .await;

        let client = RunnerClient::new(server.uri());
        assert!(client.stop().await.is_ok());
    }

    #[tokio::test]
    async fn test_server_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/pause"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
            .mount(&server)
            .await;

        let client = RunnerClient::new(server.uri());
        let err = client.pause().await.unwrap_err();

        assert!(matches!(err, ClientError::ApiError { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_command_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/resume"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"success": true}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = RunnerClient::new(server.uri())
            .with_request_timeout(Some(Duration::from_millis(50)));
        let err = client.resume().await.unwrap_err();

        assert!(err.is_timeout());
    }
}
