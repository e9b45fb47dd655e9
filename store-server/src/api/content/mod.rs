//! Store content API Module

mod handler;

use axum::{Router, routing::get};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/content", get(handler::get_content).put(handler::put_content))
}
