//! Auth API Module

mod handler;

use axum::{Router, routing::post};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/auth", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handler::register))
        .route("/login", post(handler::login))
        .route("/forgot-password", post(handler::forgot_password))
        .route("/reset-password", post(handler::reset_password))
}
