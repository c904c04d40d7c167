//! Order repository (point grants)

use super::{RepoResult, page_offset};
use crate::db::models::{Order, OrderEntry, OrderWithUser};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Record a purchase, granting `points` to the user. Strictly additive:
/// new rows start unexpired.
pub async fn create(pool: &SqlitePool, user_id: &str, points: i64) -> RepoResult<Order> {
    let order = Order {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        points,
        created_at: Utc::now(),
        expired_at: None,
    };

    sqlx::query(
        "INSERT INTO orders (id, user_id, points, created_at, expired_at) \
         VALUES (?1, ?2, ?3, ?4, NULL)",
    )
    .bind(&order.id)
    .bind(&order.user_id)
    .bind(order.points)
    .bind(order.created_at)
    .execute(pool)
    .await?;

    Ok(order)
}

/// Newest-first listing with owner info, optionally restricted to one user
pub async fn list(
    pool: &SqlitePool,
    user_id: Option<&str>,
    page: i64,
    page_size: i64,
) -> RepoResult<Vec<OrderWithUser>> {
    let rows = sqlx::query_as::<_, OrderWithUser>(
        "SELECT o.id, o.points, o.created_at, o.expired_at, \
                u.name AS user_name, u.document AS user_document \
         FROM orders o JOIN users u ON o.user_id = u.id \
         WHERE (?1 IS NULL OR o.user_id = ?1) \
         ORDER BY o.created_at DESC LIMIT ?2 OFFSET ?3",
    )
    .bind(user_id)
    .bind(page_size)
    .bind(page_offset(page, page_size))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn count(pool: &SqlitePool, user_id: Option<&str>) -> RepoResult<i64> {
    let total: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE (?1 IS NULL OR user_id = ?1)")
            .bind(user_id)
            .fetch_one(pool)
            .await?;
    Ok(total)
}

/// Ledger entries for the per-user detail page, newest first
pub async fn list_by_user(
    pool: &SqlitePool,
    user_id: &str,
    page: i64,
    page_size: i64,
) -> RepoResult<Vec<OrderEntry>> {
    let rows = sqlx::query_as::<_, OrderEntry>(
        "SELECT points, created_at, expired_at FROM orders \
         WHERE user_id = ?1 ORDER BY created_at DESC LIMIT ?2 OFFSET ?3",
    )
    .bind(user_id)
    .bind(page_size)
    .bind(page_offset(page, page_size))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
