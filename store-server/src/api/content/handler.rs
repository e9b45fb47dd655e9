//! Store content handlers

use axum::extract::{Json, State};
use shared::error::AppError;

use crate::api::{ApiResult, ok};
use crate::auth::CurrentUser;
use crate::db::models::StoreContent;
use crate::db::repository::ContentRepository;
use crate::state::AppState;

/// GET /api/content — public storefront content
pub async fn get_content(State(state): State<AppState>) -> ApiResult<StoreContent> {
    let repo = ContentRepository::new(state.db.clone());
    let content = repo.get().await.map_err(AppError::from)?;
    Ok(ok(content))
}

/// PUT /api/content — replace content settings (staff)
pub async fn put_content(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<StoreContent>,
) -> ApiResult<StoreContent> {
    user.ensure_staff()?;
    let repo = ContentRepository::new(state.db.clone());
    let content = repo.put(payload).await.map_err(AppError::from)?;
    Ok(ok(content))
}
