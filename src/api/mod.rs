//! API routes
//!
//! # Structure
//!
//! - [`health`] — liveness probe
//! - [`users`] — user registry and per-user ledger detail
//! - [`orders`] — point grants (recorded purchases)
//! - [`redeems`] — point debits (product redemptions)
//! - [`products`] — catalog management
//! - [`points`] — global expiration sweep
//!
//! Stored product images are served under `/images/`.

pub mod health;
pub mod orders;
pub mod points;
pub mod products;
pub mod redeems;
pub mod users;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    let images_dir = state.config.images_dir();

    Router::new()
        .merge(health::router())
        .merge(users::router())
        .merge(orders::router())
        .merge(redeems::router())
        .merge(products::router())
        .merge(points::router())
        .nest_service("/images", ServeDir::new(images_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
