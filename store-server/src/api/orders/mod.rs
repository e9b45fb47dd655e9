//! Order API Module
//!
//! Customer routes (owner-scoped) and the staff/admin order surface.

mod handler;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/api/user", user_routes())
        .nest("/api/admin/orders", admin_routes())
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(handler::list_own))
        .route("/orders/{id}", get(handler::get_own))
        .route("/order/cancel-order", post(handler::cancel_order))
        .route("/order/product/cancel", post(handler::cancel_item))
        .route(
            "/order/product/cancel-request",
            post(handler::request_cancel),
        )
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::admin_list))
        .route("/{id}", get(handler::admin_get))
        .route("/{id}/update-status", patch(handler::update_status))
}
