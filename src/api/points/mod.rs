//! Points expiration API module

mod handler;

use axum::{Router, routing::patch};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/points/expire", patch(handler::expire))
}
