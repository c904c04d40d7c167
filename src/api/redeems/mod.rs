//! Redeem API module (point debits)

mod handler;

use axum::{
    Router,
    routing::{delete, get},
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/redeems", get(handler::list).post(handler::create))
        .route("/api/redeems/{id}", delete(handler::remove))
}
