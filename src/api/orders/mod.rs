//! Order API module (point grants)

mod handler;

use axum::{Router, routing::get};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/orders", get(handler::list).post(handler::create))
}
