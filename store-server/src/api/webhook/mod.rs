//! Payment webhook API Module

mod handler;

use axum::{Router, routing::post};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/webhook/razorpay", post(handler::handle_webhook))
}
