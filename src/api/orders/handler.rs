//! Order API handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::db::models::{Order, OrderCreate, OrderWithUser, Paginated};
use crate::db::repository::{order, user};
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::utils::validation::{normalize_document, validate_points};

const PAGE_SIZE: i64 = 10;

/// POST /api/orders — record a purchase, crediting points to the user
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<Order>> {
    validate_points(payload.points)?;

    let user = user::find_by_id(&state.pool, &payload.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    let order = order::create(&state.pool, &user.id, payload.points).await?;
    Ok(Json(order))
}

#[derive(Deserialize)]
pub struct ListQuery {
    /// Document filter (masked or digits-only)
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// GET /api/orders — newest-first order history, optionally filtered by the
/// owner's document. An unknown document is a 404, not an empty page.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Paginated<OrderWithUser>>> {
    let page = query.page.unwrap_or(1).max(1);
    let page_size = query.limit.unwrap_or(PAGE_SIZE).clamp(1, 100);

    let user_id = match query.search.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(raw) => {
            let document = normalize_document(raw)?;
            let user = user::find_by_document(&state.pool, &document)
                .await?
                .ok_or_else(|| AppError::NotFound("User not found".into()))?;
            Some(user.id)
        }
        None => None,
    };

    let items = order::list(&state.pool, user_id.as_deref(), page, page_size).await?;
    let total = order::count(&state.pool, user_id.as_deref()).await?;

    Ok(Json(Paginated::new(items, total, page, page_size)))
}
