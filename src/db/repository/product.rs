//! Product repository

use super::{RepoError, RepoResult};
use crate::db::models::{Product, ProductCreate, ProductSummary, ProductUpdate};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

const PRODUCT_SELECT: &str =
    "SELECT id, name, points, description, image, active, code, created_at FROM products";

/// List active products for the catalog, cheapest redemption first.
/// Optional filters: case-insensitive name substring and exact code.
pub async fn list(
    pool: &SqlitePool,
    name: Option<&str>,
    code: Option<i64>,
) -> RepoResult<Vec<ProductSummary>> {
    let name_pattern = name.map(|n| format!("%{n}%"));
    let rows = sqlx::query_as::<_, ProductSummary>(
        "SELECT p.id, p.name, p.points, p.description, p.image, p.code, p.created_at, \
         (SELECT COUNT(*) FROM redeems r WHERE r.product_id = p.id) AS redeem_count \
         FROM products p \
         WHERE p.active = 1 \
           AND (?1 IS NULL OR p.name LIKE ?1) \
           AND (?2 IS NULL OR p.code = ?2) \
         ORDER BY p.points ASC",
    )
    .bind(name_pattern)
    .bind(code)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<Product>> {
    let sql = format!("{PRODUCT_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Create a product. `code` is assigned inside the INSERT as max+1 so two
/// concurrent creations cannot pick the same value.
pub async fn create(pool: &SqlitePool, data: ProductCreate) -> RepoResult<Product> {
    if data.points < 1 {
        return Err(RepoError::Validation("points must be at least 1".into()));
    }

    let id = Uuid::new_v4().to_string();
    let created_at = Utc::now();

    sqlx::query(
        "INSERT INTO products (id, name, points, description, image, active, code, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, 1, (SELECT COALESCE(MAX(code), 0) + 1 FROM products), ?6)",
    )
    .bind(&id)
    .bind(&data.name)
    .bind(data.points)
    .bind(&data.description)
    .bind(&data.image)
    .bind(created_at)
    .execute(pool)
    .await?;

    find_by_id(pool, &id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

/// Apply a partial update. Supplied fields overwrite; omitted fields are
/// left untouched (COALESCE), so nothing is ever cleared by omission.
pub async fn update(pool: &SqlitePool, id: &str, data: ProductUpdate) -> RepoResult<Product> {
    if matches!(data.points, Some(p) if p < 1) {
        return Err(RepoError::Validation("points must be at least 1".into()));
    }

    let rows = sqlx::query(
        "UPDATE products SET \
           name = COALESCE(?1, name), \
           points = COALESCE(?2, points), \
           description = COALESCE(?3, description), \
           image = COALESCE(?4, image), \
           active = COALESCE(?5, active) \
         WHERE id = ?6",
    )
    .bind(&data.name)
    .bind(data.points)
    .bind(&data.description)
    .bind(&data.image)
    .bind(data.active)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound("Product not found".into()));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound("Product not found".into()))
}

/// Soft delete: hide from the catalog, keep the row for historical redeems
pub async fn deactivate(pool: &SqlitePool, id: &str) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE products SET active = 0 WHERE id = ? AND active = 1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    fn new_product(name: &str, points: i64) -> ProductCreate {
        ProductCreate {
            name: name.into(),
            points,
            description: None,
            image: format!("/images/{name}.jpg"),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_incrementing_codes() {
        let pool = test_pool().await;
        let a = create(&pool, new_product("Caneca", 100)).await.unwrap();
        let b = create(&pool, new_product("Camiseta", 250)).await.unwrap();

        assert_eq!(a.code, 1);
        assert_eq!(b.code, 2);
        assert!(a.active);
    }

    #[tokio::test]
    async fn test_create_rejects_non_positive_points() {
        let pool = test_pool().await;
        let err = create(&pool, new_product("Gratis", 0)).await.unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }

    #[tokio::test]
    async fn test_list_orders_by_points_and_filters() {
        let pool = test_pool().await;
        create(&pool, new_product("Camiseta", 250)).await.unwrap();
        let cheap = create(&pool, new_product("Caneca", 100)).await.unwrap();
        create(&pool, new_product("Boné", 180)).await.unwrap();

        let all = list(&pool, None, None).await.unwrap();
        assert_eq!(all.len(), 3);
        // Cheapest first
        assert_eq!(all[0].id, cheap.id);
        assert!(all.windows(2).all(|w| w[0].points <= w[1].points));

        let by_name = list(&pool, Some("cane"), None).await.unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].name, "Caneca");

        let by_code = list(&pool, None, Some(cheap.code)).await.unwrap();
        assert_eq!(by_code.len(), 1);
        assert_eq!(by_code[0].id, cheap.id);
    }

    #[tokio::test]
    async fn test_deactivate_hides_from_catalog() {
        let pool = test_pool().await;
        let p = create(&pool, new_product("Caneca", 100)).await.unwrap();

        assert!(deactivate(&pool, &p.id).await.unwrap());
        assert!(list(&pool, None, None).await.unwrap().is_empty());

        // Row survives for history
        let found = find_by_id(&pool, &p.id).await.unwrap().unwrap();
        assert!(!found.active);

        // Second deactivate is a no-op
        assert!(!deactivate(&pool, &p.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_partial_update_keeps_omitted_fields() {
        let pool = test_pool().await;
        let p = create(
            &pool,
            ProductCreate {
                name: "Caneca".into(),
                points: 100,
                description: Some("Caneca de cerâmica".into()),
                image: "/images/caneca.jpg".into(),
            },
        )
        .await
        .unwrap();

        let updated = update(
            &pool,
            &p.id,
            ProductUpdate {
                points: Some(120),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.points, 120);
        assert_eq!(updated.name, "Caneca");
        assert_eq!(updated.description.as_deref(), Some("Caneca de cerâmica"));
        assert_eq!(updated.image, "/images/caneca.jpg");
    }

    #[tokio::test]
    async fn test_update_rejects_zero_points() {
        let pool = test_pool().await;
        let p = create(&pool, new_product("Caneca", 100)).await.unwrap();

        let err = update(
            &pool,
            &p.id,
            ProductUpdate {
                points: Some(0),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));

        // Unchanged
        assert_eq!(find_by_id(&pool, &p.id).await.unwrap().unwrap().points, 100);
    }

    #[tokio::test]
    async fn test_update_missing_product_is_not_found() {
        let pool = test_pool().await;
        let err = update(&pool, "nope", ProductUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }
}
