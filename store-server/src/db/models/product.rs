//! Product model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub stock: i32,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_active: bool,
    /// Vendor owning this product, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<String>,
    pub created_at: i64,
}

impl Product {
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|id| id.to_string()).unwrap_or_default()
    }
}

/// Payload for creating a product
#[derive(Debug, Clone, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub stock: i32,
    pub vendor_id: Option<String>,
}

/// Payload for updating a product (all fields optional)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
