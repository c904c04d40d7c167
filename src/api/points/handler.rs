//! Points expiration handler

use axum::{Json, extract::State};

use crate::db::repository::ledger::{self, SweepResult};
use crate::error::AppResult;
use crate::state::AppState;

/// PATCH /api/points/expire — expire every outstanding ledger row. The
/// sweep is transactional and stamps one shared timestamp, so every
/// balance drops to zero atomically.
pub async fn expire(State(state): State<AppState>) -> AppResult<Json<SweepResult>> {
    let result = ledger::expire_all(&state.pool).await?;
    Ok(Json(result))
}
