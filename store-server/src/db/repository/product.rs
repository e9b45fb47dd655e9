//! Product Repository

use super::{BaseRepository, RepoError, RepoResult, make_record_id, strip_table_prefix};
use crate::db::models::{Product, ProductCreate, ProductUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "product";

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active products
    pub async fn find_all(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE is_active = true ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Find product by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let pure_id = strip_table_prefix(TABLE, id);
        let product: Option<Product> = self.base.db().select((TABLE, pure_id)).await?;
        Ok(product)
    }

    /// Create a new product
    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        if data.price < 0.0 {
            return Err(RepoError::Validation(
                "Product price cannot be negative".to_string(),
            ));
        }

        let product = Product {
            id: None,
            name: data.name,
            description: data.description,
            price: data.price,
            images: data.images,
            stock: data.stock,
            is_active: true,
            vendor_id: data.vendor_id,
            created_at: shared::util::now_millis(),
        };

        let created: Option<Product> = self.base.db().create(TABLE).content(product).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Update a product
    pub async fn update(&self, id: &str, data: ProductUpdate) -> RepoResult<Product> {
        let pure_id = strip_table_prefix(TABLE, id);
        self.find_by_id(pure_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))?;

        if let Some(price) = data.price
            && price < 0.0
        {
            return Err(RepoError::Validation(
                "Product price cannot be negative".to_string(),
            ));
        }

        let record_id = make_record_id(TABLE, pure_id);
        self.base
            .db()
            .query("UPDATE $thing MERGE $data")
            .bind(("thing", record_id))
            .bind(("data", data))
            .await?;

        self.find_by_id(pure_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    /// Soft delete: deactivate so existing orders keep their snapshot data
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let pure_id = strip_table_prefix(TABLE, id);
        self.find_by_id(pure_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))?;

        let record_id = make_record_id(TABLE, pure_id);
        self.base
            .db()
            .query("UPDATE $thing SET is_active = false")
            .bind(("thing", record_id))
            .await?;
        Ok(true)
    }
}
