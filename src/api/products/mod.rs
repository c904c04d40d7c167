//! Product catalog API module

mod handler;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, patch},
};

use crate::state::AppState;

/// Multipart request cap. Above the 5MB image limit so oversized uploads
/// reach the store's own validation and get a proper error message.
const MAX_UPLOAD_BODY: usize = 10 * 1024 * 1024;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(handler::list).post(handler::create))
        .route(
            "/api/products/{id}",
            patch(handler::update).delete(handler::remove),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BODY))
}
