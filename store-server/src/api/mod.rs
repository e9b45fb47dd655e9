//! API routes
//!
//! # Structure
//!
//! - [`health`] - health check
//! - [`auth`] - register / login / password reset
//! - [`products`] - catalog (public read, staff write)
//! - [`cart`] - cart management
//! - [`checkout`] - checkout (prepaid + COD)
//! - [`cod`] - COD verification code flow
//! - [`webhook`] - payment provider webhook
//! - [`orders`] - customer order routes + admin order surface
//! - [`content`] - CMS-like content settings

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod cod;
pub mod content;
pub mod health;
pub mod orders;
pub mod products;
pub mod webhook;

use axum::{Json, Router};
use serde::Serialize;
use shared::error::{ApiResponse, AppError};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Result type for API handlers: enveloped JSON or an error envelope
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

/// Create a successful enveloped response
pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(data))
}

/// Create a successful enveloped response with a custom message
pub fn ok_with_message<T: Serialize>(data: T, message: impl Into<String>) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success_with_message(message, data))
}

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(products::router())
        .merge(cart::router())
        .merge(checkout::router())
        .merge(cod::router())
        .merge(webhook::router())
        .merge(orders::router())
        .merge(content::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
