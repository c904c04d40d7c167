//! Redeem repository (point debits)

use super::{RepoError, RepoResult, page_offset};
use crate::db::models::{Redeem, RedeemEntry, RedeemWithRelations};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Record a redemption against an active product.
///
/// The active check, the point-cost snapshot and the insert happen in one
/// conditional `INSERT ... SELECT`, so a product deactivated concurrently
/// can never slip through between a lookup and the write. Returns `None`
/// when the product does not exist or is inactive.
pub async fn create(
    pool: &SqlitePool,
    user_id: &str,
    product_id: &str,
) -> RepoResult<Option<Redeem>> {
    let id = Uuid::new_v4().to_string();
    let created_at = Utc::now();

    let rows = sqlx::query(
        "INSERT INTO redeems (id, user_id, product_id, points, created_at, expired_at) \
         SELECT ?1, ?2, p.id, p.points, ?3, NULL FROM products p \
         WHERE p.id = ?4 AND p.active = 1",
    )
    .bind(&id)
    .bind(user_id)
    .bind(created_at)
    .bind(product_id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Ok(None);
    }

    let redeem = sqlx::query_as::<_, Redeem>(
        "SELECT id, user_id, product_id, points, created_at, expired_at \
         FROM redeems WHERE id = ?",
    )
    .bind(&id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| RepoError::Database("Failed to create redeem".into()))?;

    Ok(Some(redeem))
}

/// Newest-first listing with user and product names, optionally restricted
/// to one user
pub async fn list(
    pool: &SqlitePool,
    user_id: Option<&str>,
    page: i64,
    page_size: i64,
) -> RepoResult<Vec<RedeemWithRelations>> {
    let rows = sqlx::query_as::<_, RedeemWithRelations>(
        "SELECT r.id, r.user_id, r.product_id, r.points, r.created_at, r.expired_at, \
                u.name AS user_name, p.name AS product_name \
         FROM redeems r \
         JOIN users u ON r.user_id = u.id \
         JOIN products p ON r.product_id = p.id \
         WHERE (?1 IS NULL OR r.user_id = ?1) \
         ORDER BY r.created_at DESC LIMIT ?2 OFFSET ?3",
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
        sqlx::query_scalar("SELECT COUNT(*) FROM redeems WHERE (?1 IS NULL OR user_id = ?1)")
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
) -> RepoResult<Vec<RedeemEntry>> {
    let rows = sqlx::query_as::<_, RedeemEntry>(
        "SELECT r.points, r.created_at, r.expired_at, p.name AS product_name \
         FROM redeems r JOIN products p ON r.product_id = p.id \
         WHERE r.user_id = ?1 ORDER BY r.created_at DESC LIMIT ?2 OFFSET ?3",
    )
    .bind(user_id)
    .bind(page_size)
    .bind(page_offset(page, page_size))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Remove a mistaken redemption (admin operation)
pub async fn delete(pool: &SqlitePool, id: &str) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM redeems WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
