//! Store content repository (singleton record)

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::StoreContent;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "store_content";
const SINGLETON_ID: &str = "main";

#[derive(Clone)]
pub struct ContentRepository {
    base: BaseRepository,
}

impl ContentRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Fetch the content record, falling back to defaults when unset
    pub async fn get(&self) -> RepoResult<StoreContent> {
        let content: Option<StoreContent> =
            self.base.db().select((TABLE, SINGLETON_ID)).await?;
        Ok(content.unwrap_or_default())
    }

    /// Replace the content record
    pub async fn put(&self, content: StoreContent) -> RepoResult<StoreContent> {
        let mut data = content;
        data.id = None;
        data.updated_at = shared::util::now_millis();

        let stored: Option<StoreContent> = self
            .base
            .db()
            .upsert((TABLE, SINGLETON_ID))
            .content(data)
            .await?;
        stored.ok_or_else(|| RepoError::Database("Failed to store content".to_string()))
    }
}
