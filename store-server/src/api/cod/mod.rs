//! COD verification API Module

mod handler;

use axum::{Router, routing::post};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/order", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/verify-cod", post(handler::verify))
        .route(
            "/resend-cod-verification",
            post(handler::resend_verification),
        )
}
