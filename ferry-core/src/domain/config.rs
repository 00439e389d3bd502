//! Job configuration domain types
//!
//! The job configuration is the single value sent to the runner on start.
//! It is rebuilt from the operator's current input every time it is needed
//! and never patched in place.

use serde::{Deserialize, Serialize};

use crate::domain::entity::EntityType;

/// Worker count the console always requests
pub const MAX_WORKERS: u32 = 10;

/// Connection to the source system (Magento)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MagentoConnection {
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub verify_ssl: bool,
}

impl MagentoConnection {
    /// Endpoint and principal are both present
    pub fn is_ready(&self) -> bool {
        !self.base_url.trim().is_empty() && !self.username.trim().is_empty()
    }
}

/// Connection to the target system (Medusa)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedusaConnection {
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl MedusaConnection {
    /// Endpoint and principal are both present
    pub fn is_ready(&self) -> bool {
        !self.base_url.trim().is_empty() && !self.email.trim().is_empty()
    }
}

/// Full job configuration as sent with the start command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobConfiguration {
    pub magento: MagentoConnection,
    pub medusa: MedusaConnection,
    pub entities: Vec<EntityType>,
    /// Record limit as typed by the operator
    pub limit: String,
    pub product_ids: String,
    pub category_ids: String,
    pub customer_ids: String,
    pub order_ids: String,
    pub dry_run: bool,
    pub finalize_orders: bool,
    pub migrate_invoices: bool,
    pub migrate_payments: bool,
    pub rollback_on_finalize_fail: bool,
    pub delta_migration: bool,
    pub delta_from_date: Option<chrono::NaiveDate>,
    pub max_workers: u32,
}
