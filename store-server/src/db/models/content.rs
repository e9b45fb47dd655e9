//! Store content settings (CMS-like singleton)

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use surrealdb::RecordId;

/// Singleton content/settings record for the storefront
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreContent {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub store_name: String,
    /// Banner shown at the top of the storefront
    #[serde(skip_serializing_if = "Option::is_none")]
    pub announcement: Option<String>,
    pub support_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub support_phone: Option<String>,
    /// Free-form CMS pages keyed by slug (about, returns, ...)
    #[serde(default)]
    pub pages: HashMap<String, String>,
    pub updated_at: i64,
}

impl Default for StoreContent {
    fn default() -> Self {
        Self {
            id: None,
            store_name: "Storefront".to_string(),
            announcement: None,
            support_email: "support@example.com".to_string(),
            support_phone: None,
            pages: HashMap::new(),
            updated_at: shared::util::now_millis(),
        }
    }
}
