//! Order Repository

use super::{BaseRepository, RepoError, RepoResult, make_record_id, strip_table_prefix};
use crate::db::models::Order;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "order";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a new order
    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        let created: Option<Order> = self.base.db().create(TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let pure_id = strip_table_prefix(TABLE, id);
        let order: Option<Order> = self.base.db().select((TABLE, pure_id)).await?;
        Ok(order)
    }

    /// Find order by id, erroring when absent
    pub async fn get(&self, id: &str) -> RepoResult<Order> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Find order by the provider-side payment intent id
    pub async fn find_by_payment_intent(&self, intent_id: &str) -> RepoResult<Option<Order>> {
        let intent = intent_id.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM order WHERE payment_intent_id = $intent LIMIT 1")
            .bind(("intent", intent))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// All orders of a user, newest first
    pub async fn find_by_user(&self, user_id: &str) -> RepoResult<Vec<Order>> {
        let user = user_id.to_string();
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE user_id = $user ORDER BY created_at DESC")
            .bind(("user", user))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Paginated order listing for the admin surface, newest first
    pub async fn find_all(&self, limit: i64, offset: i64) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order ORDER BY created_at DESC LIMIT $limit START $offset")
            .bind(("limit", limit))
            .bind(("offset", offset))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Persist the full order document (single-document atomic update)
    ///
    /// The record id comes from the order itself; the content is written with
    /// the id field stripped so the record key is never duplicated.
    pub async fn save(&self, order: &Order) -> RepoResult<Order> {
        let record_id = order
            .id
            .clone()
            .ok_or_else(|| RepoError::Validation("Order has no id".to_string()))?;

        let mut content = order.clone();
        content.id = None;
        content.updated_at = shared::util::now_millis();

        let updated: Option<Order> = self
            .base
            .db()
            .update(record_id)
            .content(content)
            .await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Order {} not found", order.id_string())))
    }

    /// Delete an order (tests and tooling only; production code never deletes)
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let record_id = make_record_id(TABLE, id);
        let _: Option<Order> = self.base.db().delete(record_id).await?;
        Ok(true)
    }
}
