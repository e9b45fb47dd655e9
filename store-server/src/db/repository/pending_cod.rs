//! Pending COD order repository

use super::{BaseRepository, RepoError, RepoResult, make_record_id, strip_table_prefix};
use crate::db::models::PendingCodOrder;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "pending_cod_order";

#[derive(Clone)]
pub struct PendingCodRepository {
    base: BaseRepository,
}

impl PendingCodRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a pending COD order
    pub async fn create(&self, pending: PendingCodOrder) -> RepoResult<PendingCodOrder> {
        let created: Option<PendingCodOrder> =
            self.base.db().create(TABLE).content(pending).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create pending COD order".to_string()))
    }

    /// Find by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<PendingCodOrder>> {
        let pure_id = strip_table_prefix(TABLE, id);
        let pending: Option<PendingCodOrder> = self.base.db().select((TABLE, pure_id)).await?;
        Ok(pending)
    }

    /// Replace the code hash and expiry, resetting the attempt counter.
    ///
    /// Invalidates the previously issued code.
    pub async fn rearm(&self, id: &str, code_hash: &str, expires_at: i64) -> RepoResult<()> {
        let record_id = make_record_id(TABLE, id);
        let hash = code_hash.to_string();
        self.base
            .db()
            .query("UPDATE $thing SET code_hash = $hash, expires_at = $expires, attempts = 0")
            .bind(("thing", record_id))
            .bind(("hash", hash))
            .bind(("expires", expires_at))
            .await?;
        Ok(())
    }

    /// Count a failed verification attempt
    pub async fn increment_attempts(&self, id: &str) -> RepoResult<()> {
        let record_id = make_record_id(TABLE, id);
        self.base
            .db()
            .query("UPDATE $thing SET attempts = attempts + 1")
            .bind(("thing", record_id))
            .await?;
        Ok(())
    }

    /// Remove the record (after promotion or abandonment)
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let record_id = make_record_id(TABLE, id);
        let _: Option<PendingCodOrder> = self.base.db().delete(record_id).await?;
        Ok(())
    }
}
