//! User model

use super::order::Address;
use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// User role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    #[default]
    Customer,
    Vendor,
    Staff,
    Admin,
}

impl UserRole {
    /// Staff and admin can operate the admin surface
    pub const fn is_staff(&self) -> bool {
        matches!(self, UserRole::Staff | UserRole::Admin)
    }
}

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub addresses: Vec<Address>,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_disabled: bool,
    pub created_at: i64,
}

impl User {
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|id| id.to_string()).unwrap_or_default()
    }
}

/// Hashed verification token (password reset etc.)
///
/// One live record per (email, purpose); re-requesting a code replaces the
/// previous one. The record is deleted on successful use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verification {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub email: String,
    pub purpose: String,
    /// Argon2 hash of the code; the plaintext is never stored
    pub code_hash: String,
    #[serde(default)]
    pub attempts: i32,
    pub expires_at: i64,
    pub created_at: i64,
}
