//! Operator input form
//!
//! Holds what the operator has typed so far. The job configuration is never
//! stored: [`ConsoleForm::gather`] rebuilds it from the current input on
//! every use.

use anyhow::Context;
use chrono::NaiveDate;
use ferry_core::domain::config::{JobConfiguration, MAX_WORKERS, MagentoConnection, MedusaConnection};
use ferry_core::domain::entity::{EntityType, UnknownEntityType, canonical_selection};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use thiserror::Error;

const MASK: &str = "********";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Unknown field '{0}'")]
    UnknownField(String),
    #[error("Invalid value '{value}' for {field} (expected true or false)")]
    InvalidBool { field: String, value: String },
    #[error("Invalid value '{value}' for {field} (expected a whole number)")]
    InvalidNumber { field: String, value: String },
    #[error("Invalid value '{value}' for {field} (expected YYYY-MM-DD)")]
    InvalidDate { field: String, value: String },
    #[error(transparent)]
    UnknownEntity(#[from] UnknownEntityType),
}

/// Current operator input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleForm {
    pub magento: MagentoConnection,
    pub medusa: MedusaConnection,
    pub entities: BTreeSet<EntityType>,
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
    pub delta_from_date: Option<NaiveDate>,
}

impl Default for ConsoleForm {
    fn default() -> Self {
        Self {
            magento: MagentoConnection::default(),
            medusa: MedusaConnection::default(),
            entities: BTreeSet::new(),
            limit: "0".to_string(),
            product_ids: String::new(),
            category_ids: String::new(),
            customer_ids: String::new(),
            order_ids: String::new(),
            dry_run: false,
            finalize_orders: true,
            migrate_invoices: false,
            migrate_payments: false,
            rollback_on_finalize_fail: false,
            delta_migration: false,
            delta_from_date: None,
        }
    }
}

impl ConsoleForm {
    /// Loads form defaults from a JSON file
    ///
    /// Any field may be omitted and keeps its default.
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read defaults file {}", path.display()))?;
        let form = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse defaults file {}", path.display()))?;
        Ok(form)
    }

    /// Builds the job configuration from the current input
    pub fn gather(&self) -> JobConfiguration {
        JobConfiguration {
            magento: self.magento.clone(),
            medusa: self.medusa.clone(),
            entities: EntityType::ALL
                .into_iter()
                .filter(|e| self.entities.contains(e))
                .collect(),
            limit: self.limit.trim().to_string(),
            product_ids: canonical_selection(self.product_ids.split(',')),
            category_ids: canonical_selection(self.category_ids.split(',')),
            customer_ids: canonical_selection(self.customer_ids.split(',')),
            order_ids: canonical_selection(self.order_ids.split(',')),
            dry_run: self.dry_run,
            finalize_orders: self.finalize_orders,
            migrate_invoices: self.migrate_invoices,
            migrate_payments: self.migrate_payments,
            rollback_on_finalize_fail: self.rollback_on_finalize_fail,
            delta_migration: self.delta_migration,
            delta_from_date: self.delta_from_date,
            max_workers: MAX_WORKERS,
        }
    }

    /// Identifier field for one entity type, as typed
    pub fn ids(&self, entity: EntityType) -> &str {
        match entity {
            EntityType::Products => &self.product_ids,
            EntityType::Categories => &self.category_ids,
            EntityType::Customers => &self.customer_ids,
            EntityType::Orders => &self.order_ids,
        }
    }

    pub fn set_ids(&mut self, entity: EntityType, value: impl Into<String>) {
        let field = match entity {
            EntityType::Products => &mut self.product_ids,
            EntityType::Categories => &mut self.category_ids,
            EntityType::Customers => &mut self.customer_ids,
            EntityType::Orders => &mut self.order_ids,
        };
        *field = value.into();
    }

    /// Edits one field by name
    ///
    /// Names are dotted for the connections (`magento.base_url`,
    /// `medusa.email`) and flat otherwise (`limit`, `dry_run`). Identifier
    /// lists accept both `ids.products` and `product_ids`.
    pub fn set(&mut self, field: &str, value: &str) -> Result<(), FormError> {
        match field {
            "magento.password" => self.magento.password = value.to_string(),
            "medusa.password" => self.medusa.password = value.to_string(),
            _ => self.set_trimmed(field, value.trim())?,
        }
        Ok(())
    }

    fn set_trimmed(&mut self, field: &str, value: &str) -> Result<(), FormError> {
        match field {
            "magento.base_url" => self.magento.base_url = value.to_string(),
            "magento.username" => self.magento.username = value.to_string(),
            "magento.verify_ssl" => self.magento.verify_ssl = parse_bool(field, value)?,
            "medusa.base_url" => self.medusa.base_url = value.to_string(),
            "medusa.email" => self.medusa.email = value.to_string(),
            "entities" => self.entities = parse_entities(value)?,
            "limit" => {
                if !value.is_empty() && value.parse::<u64>().is_err() {
                    return Err(FormError::InvalidNumber {
                        field: field.to_string(),
                        value: value.to_string(),
                    });
                }
                self.limit = value.to_string();
            }
            "dry_run" => self.dry_run = parse_bool(field, value)?,
            "finalize_orders" => self.finalize_orders = parse_bool(field, value)?,
            "migrate_invoices" => self.migrate_invoices = parse_bool(field, value)?,
            "migrate_payments" => self.migrate_payments = parse_bool(field, value)?,
            "rollback_on_finalize_fail" => {
                self.rollback_on_finalize_fail = parse_bool(field, value)?
            }
            "delta_migration" => self.delta_migration = parse_bool(field, value)?,
            "delta_from_date" => self.delta_from_date = parse_date(field, value)?,
            other => {
                let entity = ids_field_entity(other)
                    .ok_or_else(|| FormError::UnknownField(other.to_string()))?;
                self.set_ids(entity, value);
            }
        }
        Ok(())
    }

    /// Display value of one field, under any name [`ConsoleForm::set`] accepts
    pub fn field_value(&self, field: &str) -> Option<String> {
        let name = match ids_field_entity(field) {
            Some(entity) => format!("ids.{}", entity),
            None => field.to_string(),
        };
        self.fields()
            .into_iter()
            .find(|(f, _)| *f == name)
            .map(|(_, value)| value)
    }

    /// Every field with its display value, passwords masked
    pub fn fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![
            ("magento.base_url".to_string(), self.magento.base_url.clone()),
            ("magento.username".to_string(), self.magento.username.clone()),
            ("magento.password".to_string(), mask(&self.magento.password)),
            ("magento.verify_ssl".to_string(), self.magento.verify_ssl.to_string()),
            ("medusa.base_url".to_string(), self.medusa.base_url.clone()),
            ("medusa.email".to_string(), self.medusa.email.clone()),
            ("medusa.password".to_string(), mask(&self.medusa.password)),
            (
                "entities".to_string(),
                self.entities
                    .iter()
                    .map(|e| e.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            ("limit".to_string(), self.limit.clone()),
        ];
        fields.extend(
            EntityType::ALL
                .into_iter()
                .map(|e| (format!("ids.{}", e), self.ids(e).to_string())),
        );
        fields.extend([
            ("dry_run".to_string(), self.dry_run.to_string()),
            ("finalize_orders".to_string(), self.finalize_orders.to_string()),
            ("migrate_invoices".to_string(), self.migrate_invoices.to_string()),
            ("migrate_payments".to_string(), self.migrate_payments.to_string()),
            (
                "rollback_on_finalize_fail".to_string(),
                self.rollback_on_finalize_fail.to_string(),
            ),
            ("delta_migration".to_string(), self.delta_migration.to_string()),
            (
                "delta_from_date".to_string(),
                self.delta_from_date
                    .map(|d| d.to_string())
                    .unwrap_or_default(),
            ),
        ]);
        fields
    }
}

fn mask(secret: &str) -> String {
    if secret.is_empty() {
        String::new()
    } else {
        MASK.to_string()
    }
}

fn ids_field_entity(field: &str) -> Option<EntityType> {
    if let Some(name) = field.strip_prefix("ids.") {
        return name.parse().ok();
    }
    EntityType::ALL.into_iter().find(|e| e.ids_field() == field)
}

fn parse_bool(field: &str, value: &str) -> Result<bool, FormError> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(FormError::InvalidBool {
            field: field.to_string(),
            value: value.to_string(),
        }),
    }
}

fn parse_date(field: &str, value: &str) -> Result<Option<NaiveDate>, FormError> {
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| FormError::InvalidDate {
            field: field.to_string(),
            value: value.to_string(),
        })
}

fn parse_entities(value: &str) -> Result<BTreeSet<EntityType>, FormError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<EntityType>().map_err(FormError::from))
        .collect()
}
