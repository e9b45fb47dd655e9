//! Cart Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::Cart;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "cart";

#[derive(Clone)]
pub struct CartRepository {
    base: BaseRepository,
}

impl CartRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find the user's cart
    pub async fn find_by_user(&self, user_id: &str) -> RepoResult<Option<Cart>> {
        let user = user_id.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM cart WHERE user_id = $user LIMIT 1")
            .bind(("user", user))
            .await?;
        let carts: Vec<Cart> = result.take(0)?;
        Ok(carts.into_iter().next())
    }

    /// Persist a cart (insert or replace)
    pub async fn save(&self, cart: Cart) -> RepoResult<Cart> {
        let mut content = cart;
        content.updated_at = shared::util::now_millis();

        match content.id.take() {
            Some(record_id) => {
                let updated: Option<Cart> = self
                    .base
                    .db()
                    .update(record_id)
                    .content(content)
                    .await?;
                updated.ok_or_else(|| RepoError::Database("Failed to update cart".to_string()))
            }
            None => {
                let created: Option<Cart> =
                    self.base.db().create(TABLE).content(content).await?;
                created.ok_or_else(|| RepoError::Database("Failed to create cart".to_string()))
            }
        }
    }

    /// Drop the user's cart (after a successful order)
    pub async fn clear(&self, user_id: &str) -> RepoResult<()> {
        let user = user_id.to_string();
        self.base
            .db()
            .query("DELETE cart WHERE user_id = $user")
            .bind(("user", user))
            .await?;
        Ok(())
    }
}
