//! Redeem API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::db::models::{Paginated, Redeem, RedeemCreate, RedeemWithRelations};
use crate::db::repository::{ledger, product, redeem, user};
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::utils::validation::normalize_document;

const PAGE_SIZE: i64 = 10;

/// POST /api/redeems — redeem an active product for a user.
///
/// The product's current cost is snapshotted into the redeem row; later
/// catalog edits never change history. When `REQUIRE_SUFFICIENT_BALANCE` is
/// enabled the debit must be covered by the user's current balance.
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<RedeemCreate>,
) -> AppResult<Json<Redeem>> {
    let user = user::find_by_id(&state.pool, &payload.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    if state.config.require_balance {
        let product = product::find_by_id(&state.pool, &payload.product_id)
            .await?
            .filter(|p| p.active)
            .ok_or_else(|| AppError::NotFound("Product not found".into()))?;
        let balance = ledger::balance(&state.pool, &user.id).await?;
        if balance < product.points {
            return Err(AppError::Validation(format!(
                "Insufficient points: {} required, {} available",
                product.points, balance
            )));
        }
    }

    let created = redeem::create(&state.pool, &user.id, &payload.product_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".into()))?;

    Ok(Json(created))
}

#[derive(Deserialize)]
pub struct ListQuery {
    /// Document filter (masked or digits-only)
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// GET /api/redeems — newest-first redemption history, optionally filtered
/// by the owner's document. An unknown document is a 404, not an empty page.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Paginated<RedeemWithRelations>>> {
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

    let items = redeem::list(&state.pool, user_id.as_deref(), page, page_size).await?;
    let total = redeem::count(&state.pool, user_id.as_deref()).await?;

    Ok(Json(Paginated::new(items, total, page, page_size)))
}

/// DELETE /api/redeems/:id — remove a mistaken redemption, restoring the
/// points it debited
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    if !redeem::delete(&state.pool, &id).await? {
        return Err(AppError::NotFound("Redeem not found".into()));
    }
    Ok(Json(json!({ "success": true })))
}
