//! Entity listing endpoint

use crate::RunnerClient;
use crate::error::Result;
use ferry_core::dto::entity::{FetchEntitiesRequest, FetchEntitiesResponse};

impl RunnerClient {
    /// List selectable candidates for one entity type
    ///
    /// The runner authenticates against the source system with the
    /// credentials carried in the request.
    ///
    /// # Arguments
    /// * `req` - Entity type and source system credentials
    pub async fn fetch_entities(&self, req: &FetchEntitiesRequest) -> Result<FetchEntitiesResponse> {
        let response = self
            .command("/api/fetch-entities")
            .json(req)
            .send()
            .await?;

        self.handle_response(response).await
    }
}
