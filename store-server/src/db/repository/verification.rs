//! Verification token repository
//!
//! One live record per (email, purpose). Re-requesting a code replaces the
//! previous record, which invalidates the old code.

use super::{BaseRepository, RepoResult};
use crate::db::models::Verification;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct VerificationRepository {
    base: BaseRepository,
}

impl VerificationRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Insert or replace the verification record for (email, purpose)
    pub async fn upsert(
        &self,
        email: &str,
        purpose: &str,
        code_hash: &str,
        expires_at: i64,
        now: i64,
    ) -> RepoResult<()> {
        self.delete(email, purpose).await?;

        let record = Verification {
            id: None,
            email: email.to_string(),
            purpose: purpose.to_string(),
            code_hash: code_hash.to_string(),
            attempts: 0,
            expires_at,
            created_at: now,
        };
        let _: Option<Verification> = self
            .base
            .db()
            .create("verification")
            .content(record)
            .await?;
        Ok(())
    }

    /// Find the live record for (email, purpose)
    pub async fn find(&self, email: &str, purpose: &str) -> RepoResult<Option<Verification>> {
        let email_owned = email.to_string();
        let purpose_owned = purpose.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM verification WHERE email = $email AND purpose = $purpose LIMIT 1")
            .bind(("email", email_owned))
            .bind(("purpose", purpose_owned))
            .await?;
        let records: Vec<Verification> = result.take(0)?;
        Ok(records.into_iter().next())
    }

    /// Count a failed attempt against the live record
    pub async fn increment_attempts(&self, email: &str, purpose: &str) -> RepoResult<()> {
        let email_owned = email.to_string();
        let purpose_owned = purpose.to_string();
        self.base
            .db()
            .query(
                "UPDATE verification SET attempts = attempts + 1
                 WHERE email = $email AND purpose = $purpose",
            )
            .bind(("email", email_owned))
            .bind(("purpose", purpose_owned))
            .await?;
        Ok(())
    }

    /// Remove the record (on success or replacement)
    pub async fn delete(&self, email: &str, purpose: &str) -> RepoResult<()> {
        let email_owned = email.to_string();
        let purpose_owned = purpose.to_string();
        self.base
            .db()
            .query("DELETE verification WHERE email = $email AND purpose = $purpose")
            .bind(("email", email_owned))
            .bind(("purpose", purpose_owned))
            .await?;
        Ok(())
    }
}
