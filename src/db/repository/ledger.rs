//! Ledger engine
//!
//! Cross-table operations over the orders/redeems ledger: the derived
//! point balance and the global expiration sweep.
//!
//! The balance is never stored. It is recomputed from the unexpired ledger
//! rows on every read, so it cannot drift from the rows that back it.

use super::RepoResult;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;

/// Outcome of an expiration sweep
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepResult {
    pub success: bool,
    pub expired_orders: u64,
    pub expired_redeems: u64,
    pub expired_at: DateTime<Utc>,
}

/// Current point balance for a user: unexpired grants minus unexpired debits
pub async fn balance(pool: &SqlitePool, user_id: &str) -> RepoResult<i64> {
    let balance: i64 = sqlx::query_scalar(
        "SELECT \
           COALESCE((SELECT SUM(points) FROM orders  WHERE user_id = ?1 AND expired_at IS NULL), 0) \
         - COALESCE((SELECT SUM(points) FROM redeems WHERE user_id = ?1 AND expired_at IS NULL), 0)",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(balance)
}

/// Expire every currently-unexpired order and redeem, as of now.
///
/// Both tables are stamped with the same timestamp inside one transaction:
/// either both updates commit or neither does. A half-expired ledger would
/// corrupt the balance of any user with rows in only one of the tables, so
/// partial application is never allowed. Failure rolls back completely and
/// the sweep is safe to retry — the same still-unexpired rows are simply
/// attempted again.
pub async fn expire_all(pool: &SqlitePool) -> RepoResult<SweepResult> {
    let now = Utc::now();
    let mut tx = pool.begin().await?;

    let expired_orders = sqlx::query("UPDATE orders SET expired_at = ?1 WHERE expired_at IS NULL")
        .bind(now)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let expired_redeems =
        sqlx::query("UPDATE redeems SET expired_at = ?1 WHERE expired_at IS NULL")
            .bind(now)
            .execute(&mut *tx)
            .await?
            .rows_affected();

    tx.commit().await?;

    tracing::info!(expired_orders, expired_redeems, "Expiration sweep applied");

    Ok(SweepResult {
        success: true,
        expired_orders,
        expired_redeems,
        expired_at: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{ProductCreate, UserCreate};
    use crate::db::repository::{order, product, redeem, user};
    use crate::db::test_pool;

    async fn seed_user(pool: &SqlitePool, document: &str) -> String {
        user::create(
            pool,
            UserCreate {
                name: "Ana".into(),
                document: document.into(),
            },
        )
        .await
        .unwrap()
        .id
    }

    async fn seed_product(pool: &SqlitePool, points: i64) -> String {
        product::create(
            pool,
            ProductCreate {
                name: "Caneca".into(),
                points,
                description: None,
                image: "/images/caneca.jpg".into(),
            },
        )
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn test_balance_is_zero_without_ledger_rows() {
        let pool = test_pool().await;
        let uid = seed_user(&pool, "12345678901").await;
        assert_eq!(balance(&pool, &uid).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_balance_is_grants_minus_debits() {
        let pool = test_pool().await;
        let uid = seed_user(&pool, "12345678901").await;
        let pid = seed_product(&pool, 50).await;

        // Orders totaling 150, one redeem of 50 → 100
        order::create(&pool, &uid, 100).await.unwrap();
        order::create(&pool, &uid, 50).await.unwrap();
        redeem::create(&pool, &uid, &pid).await.unwrap().unwrap();

        assert_eq!(balance(&pool, &uid).await.unwrap(), 100);
    }

    #[tokio::test]
    async fn test_balance_ignores_expired_rows() {
        let pool = test_pool().await;
        let uid = seed_user(&pool, "12345678901").await;

        let old = order::create(&pool, &uid, 70).await.unwrap();
        order::create(&pool, &uid, 30).await.unwrap();

        sqlx::query("UPDATE orders SET expired_at = ?1 WHERE id = ?2")
            .bind(Utc::now())
            .bind(&old.id)
            .execute(&pool)
            .await
            .unwrap();

        assert_eq!(balance(&pool, &uid).await.unwrap(), 30);
    }

    #[tokio::test]
    async fn test_balance_is_per_user() {
        let pool = test_pool().await;
        let ana = seed_user(&pool, "12345678901").await;
        let bruno = seed_user(&pool, "98765432100").await;

        order::create(&pool, &ana, 100).await.unwrap();
        order::create(&pool, &bruno, 25).await.unwrap();

        assert_eq!(balance(&pool, &ana).await.unwrap(), 100);
        assert_eq!(balance(&pool, &bruno).await.unwrap(), 25);
    }

    #[tokio::test]
    async fn test_expire_all_zeroes_every_balance() {
        let pool = test_pool().await;
        let uid = seed_user(&pool, "12345678901").await;
        let pid = seed_product(&pool, 50).await;

        order::create(&pool, &uid, 100).await.unwrap();
        order::create(&pool, &uid, 50).await.unwrap();
        redeem::create(&pool, &uid, &pid).await.unwrap().unwrap();
        assert_eq!(balance(&pool, &uid).await.unwrap(), 100);

        let sweep = expire_all(&pool).await.unwrap();
        assert!(sweep.success);
        assert_eq!(sweep.expired_orders, 2);
        assert_eq!(sweep.expired_redeems, 1);

        assert_eq!(balance(&pool, &uid).await.unwrap(), 0);

        // Every row carries the sweep timestamp; history remains queryable
        let orders = order::list_by_user(&pool, &uid, 1, 10).await.unwrap();
        let redeems = redeem::list_by_user(&pool, &uid, 1, 10).await.unwrap();
        assert!(orders.iter().all(|o| o.expired_at == Some(sweep.expired_at)));
        assert!(redeems.iter().all(|r| r.expired_at == Some(sweep.expired_at)));
    }

    #[tokio::test]
    async fn test_expire_all_skips_already_expired_rows() {
        let pool = test_pool().await;
        let uid = seed_user(&pool, "12345678901").await;

        order::create(&pool, &uid, 10).await.unwrap();
        let first = expire_all(&pool).await.unwrap();
        assert_eq!(first.expired_orders, 1);

        order::create(&pool, &uid, 20).await.unwrap();
        let second = expire_all(&pool).await.unwrap();
        assert_eq!(second.expired_orders, 1);

        // The row expired by the first sweep keeps its original timestamp
        let entries = order::list_by_user(&pool, &uid, 1, 10).await.unwrap();
        let stamps: Vec<_> = entries.iter().filter_map(|e| e.expired_at).collect();
        assert!(stamps.contains(&first.expired_at));
        assert!(stamps.contains(&second.expired_at));
    }

    #[tokio::test]
    async fn test_expire_all_on_empty_ledger_is_a_noop() {
        let pool = test_pool().await;
        let sweep = expire_all(&pool).await.unwrap();
        assert_eq!(sweep.expired_orders, 0);
        assert_eq!(sweep.expired_redeems, 0);
    }
}
