//! Cart API Handlers

use axum::extract::{Json, Path, State};
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};

use crate::api::{ApiResult, ok};
use crate::auth::CurrentUser;
use crate::db::models::{Cart, CartItem};
use crate::db::repository::{CartRepository, ProductRepository};
use crate::state::AppState;

/// Get the current user's cart (empty cart when none exists)
pub async fn get_cart(State(state): State<AppState>, user: CurrentUser) -> ApiResult<Cart> {
    let repo = CartRepository::new(state.db.clone());
    let cart = repo
        .find_by_user(&user.user_id)
        .await
        .map_err(AppError::from)?
        .unwrap_or_else(|| Cart::empty(&user.user_id));
    Ok(ok(cart))
}

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

fn default_quantity() -> i32 {
    1
}

/// Add a product to the cart (or bump its quantity)
pub async fn add_item(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<AddItemRequest>,
) -> ApiResult<Cart> {
    if payload.quantity <= 0 {
        return Err(AppError::validation("Quantity must be positive"));
    }

    let products = ProductRepository::new(state.db.clone());
    let product = products
        .find_by_id(&payload.product_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
    if !product.is_active {
        return Err(AppError::new(ErrorCode::ProductInactive));
    }

    let carts = CartRepository::new(state.db.clone());
    let mut cart = carts
        .find_by_user(&user.user_id)
        .await
        .map_err(AppError::from)?
        .unwrap_or_else(|| Cart::empty(&user.user_id));

    let product_id = product.id_string();
    match cart.items.iter_mut().find(|i| i.product_id == product_id) {
        Some(item) => item.quantity += payload.quantity,
        None => cart.items.push(CartItem {
            product_id,
            name: product.name.clone(),
            price: product.price,
            quantity: payload.quantity,
        }),
    }

    let cart = carts.save(cart).await.map_err(AppError::from)?;
    Ok(ok(cart))
}

#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub quantity: i32,
}

/// Set the quantity of a cart line (0 removes it)
pub async fn update_item(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(product_id): Path<String>,
    Json(payload): Json<UpdateItemRequest>,
) -> ApiResult<Cart> {
    if payload.quantity < 0 {
        return Err(AppError::validation("Quantity cannot be negative"));
    }

    let carts = CartRepository::new(state.db.clone());
    let mut cart = carts
        .find_by_user(&user.user_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::CartItemNotFound))?;

    if !cart.items.iter().any(|i| i.product_id == product_id) {
        return Err(AppError::new(ErrorCode::CartItemNotFound));
    }

    if payload.quantity == 0 {
        cart.items.retain(|i| i.product_id != product_id);
    } else if let Some(item) = cart.items.iter_mut().find(|i| i.product_id == product_id) {
        item.quantity = payload.quantity;
    }

    let cart = carts.save(cart).await.map_err(AppError::from)?;
    Ok(ok(cart))
}

/// Remove a product from the cart
pub async fn remove_item(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(product_id): Path<String>,
) -> ApiResult<Cart> {
    let carts = CartRepository::new(state.db.clone());
    let mut cart = carts
        .find_by_user(&user.user_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::CartItemNotFound))?;

    let before = cart.items.len();
    cart.items.retain(|i| i.product_id != product_id);
    if cart.items.len() == before {
        return Err(AppError::new(ErrorCode::CartItemNotFound));
    }

    let cart = carts.save(cart).await.map_err(AppError::from)?;
    Ok(ok(cart))
}

/// Empty the cart
pub async fn clear_cart(State(state): State<AppState>, user: CurrentUser) -> ApiResult<bool> {
    let carts = CartRepository::new(state.db.clone());
    carts.clear(&user.user_id).await.map_err(AppError::from)?;
    Ok(ok(true))
}
