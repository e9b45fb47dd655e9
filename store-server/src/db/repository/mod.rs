//! Repository Module
//!
//! CRUD access to the embedded SurrealDB store. One repository per table;
//! all of them share [`BaseRepository`] and the `RepoError` taxonomy.

pub mod cart;
pub mod content;
pub mod order;
pub mod pending_cod;
pub mod product;
pub mod user;
pub mod verification;
pub mod webhook_event;

// Re-exports
pub use cart::CartRepository;
pub use content::ContentRepository;
pub use order::OrderRepository;
pub use pending_cod::PendingCodRepository;
pub use product::ProductRepository;
pub use user::UserRepository;
pub use verification::VerificationRepository;
pub use webhook_event::WebhookEventRepository;

use shared::error::{AppError, ErrorCode};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: "table:id" strings everywhere above the repository layer
// =============================================================================
//
// surrealdb::RecordId handles all ids:
//   - parse:      let id: RecordId = "order:abc".parse()?;
//   - construct:  RecordId::from_table_key("order", "abc")
//   - key only:   id.key().to_string()

/// Build a RecordId from a table name and a (possibly prefixed) id
pub fn make_record_id(table: &str, id: &str) -> RecordId {
    RecordId::from_table_key(table, strip_table_prefix(table, id))
}

/// Extract the pure key if the id carries a "table:" prefix
pub fn strip_table_prefix<'a>(table: &str, id: &'a str) -> &'a str {
    match id.split_once(':') {
        Some((prefix, key)) if prefix == table => key,
        _ => id,
    }
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_table_prefix() {
        assert_eq!(strip_table_prefix("order", "order:abc"), "abc");
        assert_eq!(strip_table_prefix("order", "abc"), "abc");
        assert_eq!(strip_table_prefix("order", "user:abc"), "user:abc");
    }

    #[test]
    fn test_make_record_id() {
        let id = make_record_id("order", "order:abc");
        assert_eq!(id.to_string(), "order:abc");
        let id = make_record_id("order", "abc");
        assert_eq!(id.to_string(), "order:abc");
    }
}
