//! Product API Module

mod handler;

use axum::{Router, routing::get};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/products", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .patch(handler::update)
                .delete(handler::delete),
        )
}
