//! Entity listing DTOs

use serde::{Deserialize, Serialize};

use crate::domain::config::MagentoConnection;
use crate::domain::entity::{EntityItem, EntityType};

/// Request for the candidates of one entity type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchEntitiesRequest {
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub magento_config: MagentoConnection,
}

/// Response of the fetch-entities command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchEntitiesResponse {
    pub success: bool,
    #[serde(default)]
    pub items: Vec<EntityItem>,
    #[serde(default)]
    pub error: Option<String>,
}

impl FetchEntitiesResponse {
    /// Candidates on success, the server's error text otherwise
    pub fn into_result(self) -> Result<Vec<EntityItem>, String> {
        if self.success {
            Ok(self.items)
        } else {
            Err(self.error.unwrap_or_else(|| "Unknown error".to_string()))
        }
    }
}
