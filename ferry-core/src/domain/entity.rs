//! Remote entity domain types
//!
//! Identifiers reach the console from two independent sources: the selection
//! text stored in the job configuration and the candidates freshly fetched
//! from the source system, where they may be JSON numbers or strings.
//! Anything that compares identifiers goes through [`EntityId::key`].

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Kind of remote entity a migration can be scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Products,
    Categories,
    Customers,
    Orders,
}

impl EntityType {
    /// All entity types, in the order the console lists them
    pub const ALL: [EntityType; 4] = [
        EntityType::Products,
        EntityType::Categories,
        EntityType::Customers,
        EntityType::Orders,
    ];

    /// Wire name of the entity type (e.g. "products")
    pub fn as_str(self) -> &'static str {
        match self {
            EntityType::Products => "products",
            EntityType::Categories => "categories",
            EntityType::Customers => "customers",
            EntityType::Orders => "orders",
        }
    }

    /// Name of the job configuration field holding this type's identifier list
    pub fn ids_field(self) -> &'static str {
        match self {
            EntityType::Products => "product_ids",
            EntityType::Categories => "category_ids",
            EntityType::Customers => "customer_ids",
            EntityType::Orders => "order_ids",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known entity type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown entity type '{0}' (expected products, categories, customers or orders)")]
pub struct UnknownEntityType(pub String);

impl FromStr for EntityType {
    type Err = UnknownEntityType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "products" | "product" => Ok(EntityType::Products),
            "categories" | "category" => Ok(EntityType::Categories),
            "customers" | "customer" => Ok(EntityType::Customers),
            "orders" | "order" => Ok(EntityType::Orders),
            other => Err(UnknownEntityType(other.to_string())),
        }
    }
}

/// Opaque identifier of a remote entity
///
/// The source system returns numeric ids for most entities but nothing
/// guarantees it, so any JSON scalar is accepted on the wire. A missing id
/// arrives as `null` and keys as `"null"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Number(serde_json::Number),
    Text(String),
    Bool(bool),
    Null,
}

impl EntityId {
    /// Normalized string form used for every identifier comparison
    pub fn key(&self) -> String {
        match self {
            EntityId::Number(n) => n.to_string(),
            EntityId::Text(s) => s.trim().to_string(),
            EntityId::Bool(b) => b.to_string(),
            EntityId::Null => "null".to_string(),
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl From<i64> for EntityId {
    fn from(n: i64) -> Self {
        EntityId::Number(n.into())
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        EntityId::Text(s.to_string())
    }
}

/// A selectable remote entity as listed by the runner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityItem {
    pub id: EntityId,
    pub label: String,
}

impl EntityItem {
    pub fn new(id: impl Into<EntityId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Splits a stored selection string into identifier keys
///
/// Keys are trimmed, empty segments dropped, and duplicates removed while
/// keeping the first occurrence's position.
pub fn parse_selection(raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.to_string()))
        .map(ToOwned::to_owned)
        .collect()
}

/// Membership set of a stored selection string
pub fn selection_set(raw: &str) -> HashSet<String> {
    parse_selection(raw).into_iter().collect()
}

/// Canonical selection string: trimmed, de-duplicated, order-preserving, `", "`-joined
pub fn canonical_selection<I, S>(ids: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    ids.into_iter()
        .map(|id| id.as_ref().trim().to_string())
        .filter(|id| !id.is_empty())
        .filter(|id| seen.insert(id.clone()))
        .collect::<Vec<_>>()
        .join(", ")
}
