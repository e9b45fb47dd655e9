//! Processed webhook event ledger (idempotency)

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// A webhook event that has already been handled
///
/// Keyed by the provider event id; insert-first dedup makes redeliveries
/// no-ops.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub event_type: String,
    pub processed_at: i64,
}
