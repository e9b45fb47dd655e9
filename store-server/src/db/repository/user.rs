//! User Repository

use super::{BaseRepository, RepoError, RepoResult, strip_table_prefix};
use crate::db::models::User;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find user by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let pure_id = strip_table_prefix(TABLE, id);
        let user: Option<User> = self.base.db().select((TABLE, pure_id)).await?;
        Ok(user)
    }

    /// Find user by email (lowercased by callers)
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let email_owned = email.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email_owned))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Create a new user
    pub async fn create(&self, user: User) -> RepoResult<User> {
        if self.find_by_email(&user.email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "User '{}' already exists",
                user.email
            )));
        }

        let created: Option<User> = self.base.db().create(TABLE).content(user).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Replace the stored password hash
    pub async fn update_password(&self, id: &str, password_hash: &str) -> RepoResult<()> {
        let pure_id = strip_table_prefix(TABLE, id).to_string();
        let hash = password_hash.to_string();
        self.base
            .db()
            .query("UPDATE type::thing('user', $id) SET password_hash = $hash")
            .bind(("id", pure_id))
            .bind(("hash", hash))
            .await?;
        Ok(())
    }
}
