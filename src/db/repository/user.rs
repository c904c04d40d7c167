//! User repository

use super::{RepoError, RepoResult, page_offset};
use crate::db::models::{User, UserCreate, UserWithPoints};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Base projection with the balance derived from the unexpired ledger rows
const USER_WITH_POINTS_SELECT: &str = "SELECT u.id, u.name, u.document, u.created_at, \
     COALESCE((SELECT SUM(o.points) FROM orders o WHERE o.user_id = u.id AND o.expired_at IS NULL), 0) \
   - COALESCE((SELECT SUM(r.points) FROM redeems r WHERE r.user_id = u.id AND r.expired_at IS NULL), 0) \
   AS points FROM users u";

/// Case-insensitive substring search over name OR document, newest first.
/// An empty query matches all users.
pub async fn search(
    pool: &SqlitePool,
    query: &str,
    page: i64,
    page_size: i64,
) -> RepoResult<Vec<UserWithPoints>> {
    let pattern = format!("%{query}%");
    let sql = format!(
        "{USER_WITH_POINTS_SELECT} WHERE u.name LIKE ?1 OR u.document LIKE ?1 \
         ORDER BY u.created_at DESC LIMIT ?2 OFFSET ?3"
    );
    let rows = sqlx::query_as::<_, UserWithPoints>(&sql)
        .bind(&pattern)
        .bind(page_size)
        .bind(page_offset(page, page_size))
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Total rows the search would match, for the pagination envelope
pub async fn count_search(pool: &SqlitePool, query: &str) -> RepoResult<i64> {
    let pattern = format!("%{query}%");
    let total: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE name LIKE ?1 OR document LIKE ?1")
            .bind(&pattern)
            .fetch_one(pool)
            .await?;
    Ok(total)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<User>> {
    let row = sqlx::query_as::<_, User>(
        "SELECT id, name, document, created_at FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn find_by_document(pool: &SqlitePool, document: &str) -> RepoResult<Option<User>> {
    let row = sqlx::query_as::<_, User>(
        "SELECT id, name, document, created_at FROM users WHERE document = ?",
    )
    .bind(document)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Create a user. The document must already be normalized to digits only;
/// a second user with the same document is rejected.
pub async fn create(pool: &SqlitePool, data: UserCreate) -> RepoResult<User> {
    if find_by_document(pool, &data.document).await?.is_some() {
        return Err(RepoError::Duplicate("User already exists".into()));
    }

    let user = User {
        id: Uuid::new_v4().to_string(),
        name: data.name,
        document: data.document,
        created_at: Utc::now(),
    };

    // The UNIQUE constraint backstops the read-then-insert window above.
    sqlx::query("INSERT INTO users (id, name, document, created_at) VALUES (?1, ?2, ?3, ?4)")
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.document)
        .bind(user.created_at)
        .execute(pool)
        .await
        .map_err(|e| match RepoError::from(e) {
            RepoError::Duplicate(_) => RepoError::Duplicate("User already exists".into()),
            other => other,
        })?;

    Ok(user)
}
