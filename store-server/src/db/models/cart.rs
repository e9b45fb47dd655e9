//! Cart model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Cart line item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    pub product_id: String,
    pub name: String,
    pub price: f64,
    pub quantity: i32,
}

/// Shopping cart (one per user)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub user_id: String,
    #[serde(default)]
    pub items: Vec<CartItem>,
    pub updated_at: i64,
}

impl Cart {
    pub fn empty(user_id: impl Into<String>) -> Self {
        Self {
            id: None,
            user_id: user_id.into(),
            items: Vec::new(),
            updated_at: shared::util::now_millis(),
        }
    }

    pub fn total(&self) -> f64 {
        self.items
            .iter()
            .map(|item| item.price * item.quantity as f64)
            .sum()
    }
}
