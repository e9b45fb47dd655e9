//! Product API Handlers
//!
//! Catalog reads are public; writes require a staff session.

use axum::extract::{Json, Path, State};
use shared::error::{AppError, ErrorCode};

use crate::api::{ApiResult, ok};
use crate::auth::CurrentUser;
use crate::db::models::{Product, ProductCreate, ProductUpdate};
use crate::db::repository::ProductRepository;
use crate::state::AppState;

/// List all active products
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Product>> {
    let repo = ProductRepository::new(state.db.clone());
    let products = repo.find_all().await.map_err(AppError::from)?;
    Ok(ok(products))
}

/// Get product by id
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Product> {
    let repo = ProductRepository::new(state.db.clone());
    let product = repo
        .find_by_id(&id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
    Ok(ok(product))
}

/// Create a product (staff)
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<ProductCreate>,
) -> ApiResult<Product> {
    user.ensure_staff()?;
    let repo = ProductRepository::new(state.db.clone());
    let product = repo.create(payload).await.map_err(AppError::from)?;
    Ok(ok(product))
}

/// Update a product (staff)
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> ApiResult<Product> {
    user.ensure_staff()?;
    let repo = ProductRepository::new(state.db.clone());
    let product = repo.update(&id, payload).await.map_err(AppError::from)?;
    Ok(ok(product))
}

/// Deactivate a product (staff)
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<bool> {
    user.ensure_staff()?;
    let repo = ProductRepository::new(state.db.clone());
    let deleted = repo.delete(&id).await.map_err(AppError::from)?;
    Ok(ok(deleted))
}
