//! Processed webhook event repository (idempotency ledger)

use super::{BaseRepository, RepoResult};
use crate::db::models::WebhookEvent;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "webhook_event";

#[derive(Clone)]
pub struct WebhookEventRepository {
    base: BaseRepository,
}

impl WebhookEventRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Record an event id, insert-first. Returns false when the event was
    /// already recorded (duplicate delivery).
    pub async fn insert_new(&self, event_id: &str, event_type: &str) -> RepoResult<bool> {
        let record = WebhookEvent {
            id: None,
            event_type: event_type.to_string(),
            processed_at: shared::util::now_millis(),
        };

        // CREATE on an existing record id fails; that failure is the dedup
        // signal, not an error.
        let result: Result<Option<WebhookEvent>, surrealdb::Error> = self
            .base
            .db()
            .create((TABLE, event_id))
            .content(record)
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(err) if err.to_string().contains("already exists") => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}
