//! Checkout API Module

mod handler;

use axum::{Router, routing::post};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/checkout", post(handler::checkout))
}
