//! Database Module
//!
//! Owns the embedded SurrealDB instance. The schema (tables + indexes) is
//! defined exactly once here, at startup; tests open their own store in a
//! temp directory and get teardown for free when the directory drops.

pub mod models;
pub mod repository;

use shared::error::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the store at `db_path` and register the schema
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns("storefront")
            .use_db("main")
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        Self::define_schema(&db).await?;

        tracing::info!(path = db_path, "Database ready");
        Ok(Self { db })
    }

    /// Register tables and indexes (idempotent)
    async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
        db.query(
            r#"
            DEFINE TABLE IF NOT EXISTS user SCHEMALESS;
            DEFINE INDEX IF NOT EXISTS idx_user_email ON TABLE user COLUMNS email UNIQUE;

            DEFINE TABLE IF NOT EXISTS order SCHEMALESS;
            DEFINE INDEX IF NOT EXISTS idx_order_user ON TABLE order COLUMNS user_id;
            DEFINE INDEX IF NOT EXISTS idx_order_intent ON TABLE order COLUMNS payment_intent_id;

            DEFINE TABLE IF NOT EXISTS cart SCHEMALESS;
            DEFINE INDEX IF NOT EXISTS idx_cart_user ON TABLE cart COLUMNS user_id UNIQUE;

            DEFINE TABLE IF NOT EXISTS product SCHEMALESS;

            DEFINE TABLE IF NOT EXISTS pending_cod_order SCHEMALESS;
            DEFINE INDEX IF NOT EXISTS idx_pending_cod_user ON TABLE pending_cod_order COLUMNS user_id;

            DEFINE TABLE IF NOT EXISTS verification SCHEMALESS;
            DEFINE INDEX IF NOT EXISTS idx_verification_key ON TABLE verification COLUMNS email, purpose;

            DEFINE TABLE IF NOT EXISTS store_content SCHEMALESS;

            DEFINE TABLE IF NOT EXISTS webhook_event SCHEMALESS;
            "#,
        )
        .await
        .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?;
        Ok(())
    }
}
