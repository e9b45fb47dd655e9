//! Pending COD order model
//!
//! A COD checkout is held here until the emailed verification code is
//! confirmed. The record stores only the argon2 hash of the code; a resend
//! replaces the hash and expiry, invalidating the previous code.

use super::order::{Address, OrderItem};
use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Code validity window (15 minutes)
pub const COD_CODE_TTL_MS: i64 = 15 * 60 * 1000;

/// Max wrong-code attempts before the record must be re-armed via resend
pub const COD_MAX_ATTEMPTS: i32 = 5;

/// Transient pre-order awaiting COD code verification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingCodOrder {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub user_id: String,
    pub items: Vec<OrderItem>,
    pub total: f64,
    pub shipping_address: Address,
    /// Argon2 hash of the verification code
    pub code_hash: String,
    #[serde(default)]
    pub attempts: i32,
    pub expires_at: i64,
    pub created_at: i64,
}

impl PendingCodOrder {
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|id| id.to_string()).unwrap_or_default()
    }

    pub fn is_expired(&self, now: i64) -> bool {
        now > self.expires_at
    }
}
