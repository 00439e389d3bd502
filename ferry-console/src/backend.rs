//! Backend seam
//!
//! The console reaches the job runner only through [`Backend`], so the event
//! loop can be driven against a scripted fake.

use async_trait::async_trait;
use ferry_client::{Result, RunnerClient};
use ferry_core::domain::config::{JobConfiguration, MagentoConnection, MedusaConnection};
use ferry_core::dto::auth::AuthResponse;
use ferry_core::dto::command::CommandResponse;
use ferry_core::dto::entity::{FetchEntitiesRequest, FetchEntitiesResponse};

#[async_trait]
pub trait Backend: Send + Sync {
    async fn test_magento(&self, connection: &MagentoConnection) -> Result<AuthResponse>;

    async fn test_medusa(&self, connection: &MedusaConnection) -> Result<AuthResponse>;

    async fn start(&self, config: &JobConfiguration) -> Result<CommandResponse>;

    async fn stop(&self) -> Result<()>;

    async fn pause(&self) -> Result<CommandResponse>;

    async fn resume(&self) -> Result<CommandResponse>;

    async fn fetch_entities(&self, request: &FetchEntitiesRequest) -> Result<FetchEntitiesResponse>;
}

#[async_trait]
impl Backend for RunnerClient {
    async fn test_magento(&self, connection: &MagentoConnection) -> Result<AuthResponse> {
        RunnerClient::test_magento(self, connection).await
    }

    async fn test_medusa(&self, connection: &MedusaConnection) -> Result<AuthResponse> {
        RunnerClient::test_medusa(self, connection).await
    }

    async fn start(&self, config: &JobConfiguration) -> Result<CommandResponse> {
        RunnerClient::start(self, config).await
    }

    async fn stop(&self) -> Result<()> {
        RunnerClient::stop(self).await
    }

    async fn pause(&self) -> Result<CommandResponse> {
        RunnerClient::pause(self).await
    }

    async fn resume(&self) -> Result<CommandResponse> {
        RunnerClient::resume(self).await
    }

    async fn fetch_entities(&self, request: &FetchEntitiesRequest) -> Result<FetchEntitiesResponse> {
        RunnerClient::fetch_entities(self, request).await
    }
}
