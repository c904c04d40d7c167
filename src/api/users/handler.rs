//! User API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::db::models::{OrderEntry, Paginated, RedeemEntry, User, UserCreate, UserWithPoints};
use crate::db::repository::{ledger, order, redeem, user};
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::utils::validation::{MAX_NAME_LEN, normalize_document, validate_required_text};

/// Default page size for the user search (admin list view)
const SEARCH_PAGE_SIZE: i64 = 5;
/// Page size for the per-user ledger detail
const DETAIL_PAGE_SIZE: i64 = 10;

#[derive(Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// GET /api/users — search users, each with its derived balance
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Paginated<UserWithPoints>>> {
    let search = query.search.as_deref().unwrap_or("");
    let page = query.page.unwrap_or(1).max(1);
    let page_size = query.limit.unwrap_or(SEARCH_PAGE_SIZE).clamp(1, 100);

    let items = user::search(&state.pool, search, page, page_size).await?;
    let total = user::count_search(&state.pool, search).await?;

    Ok(Json(Paginated::new(items, total, page, page_size)))
}

/// POST /api/users — register a user
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<User>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    let document = normalize_document(&payload.document)?;

    let created = user::create(
        &state.pool,
        UserCreate {
            name: payload.name,
            document,
        },
    )
    .await?;

    Ok(Json(created))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailQuery {
    pub order_page: Option<i64>,
    pub redeem_page: Option<i64>,
}

/// User detail response: user, derived balance and paginated ledger entries
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: User,
    pub points: i64,
    pub orders: Vec<OrderEntry>,
    pub redeems: Vec<RedeemEntry>,
}

/// GET /api/users/:id — per-user detail with independently paged
/// orders/redeems (`orderPage` / `redeemPage`)
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DetailQuery>,
) -> AppResult<Json<UserDetail>> {
    let user = user::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    let order_page = query.order_page.unwrap_or(1).max(1);
    let redeem_page = query.redeem_page.unwrap_or(1).max(1);

    let points = ledger::balance(&state.pool, &user.id).await?;
    let orders = order::list_by_user(&state.pool, &user.id, order_page, DETAIL_PAGE_SIZE).await?;
    let redeems =
        redeem::list_by_user(&state.pool, &user.id, redeem_page, DETAIL_PAGE_SIZE).await?;

    Ok(Json(UserDetail {
        user,
        points,
        orders,
        redeems,
    }))
}

/// GET /api/users/by-document/:document — customer-facing lookup with the
/// most recent activity (5 orders, 2 redeems)
pub async fn get_by_document(
    State(state): State<AppState>,
    Path(document): Path<String>,
) -> AppResult<Json<UserDetail>> {
    let document = normalize_document(&document)?;
    let user = user::find_by_document(&state.pool, &document)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    let points = ledger::balance(&state.pool, &user.id).await?;
    let orders = order::list_by_user(&state.pool, &user.id, 1, 5).await?;
    let redeems = redeem::list_by_user(&state.pool, &user.id, 1, 2).await?;

    Ok(Json(UserDetail {
        user,
        points,
        orders,
        redeems,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    async fn test_state() -> AppState {
        let dir = tempfile::tempdir().unwrap();
        AppState::for_tests(test_pool().await, dir.keep()).await
    }

    #[tokio::test]
    async fn test_create_normalizes_masked_document() {
        let state = test_state().await;
        let created = create(
            State(state.clone()),
            Json(UserCreate {
                name: "Ana".into(),
                document: "123.456.789-01".into(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(created.0.document, "12345678901");
    }

    #[tokio::test]
    async fn test_create_rejects_bad_document_and_empty_name() {
        let state = test_state().await;

        let err = create(
            State(state.clone()),
            Json(UserCreate {
                name: "Ana".into(),
                document: "123".into(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = create(
            State(state),
            Json(UserCreate {
                name: "  ".into(),
                document: "12345678901".into(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_duplicate_document_is_a_conflict() {
        let state = test_state().await;
        let payload = UserCreate {
            name: "Ana".into(),
            document: "12345678901".into(),
        };
        create(State(state.clone()), Json(payload.clone()))
            .await
            .unwrap();

        let err = create(State(state), Json(payload)).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_get_by_document_accepts_mask() {
        let state = test_state().await;
        create(
            State(state.clone()),
            Json(UserCreate {
                name: "Ana".into(),
                document: "12345678901".into(),
            }),
        )
        .await
        .unwrap();

        let detail = get_by_document(State(state), Path("123.456.789-01".into()))
            .await
            .unwrap();
        assert_eq!(detail.0.points, 0);
        assert!(detail.0.orders.is_empty());
    }

    #[tokio::test]
    async fn test_get_by_id_unknown_user() {
        let state = test_state().await;
        let err = get_by_id(
            State(state),
            Path("missing".into()),
            Query(DetailQuery {
                order_page: None,
                redeem_page: None,
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
