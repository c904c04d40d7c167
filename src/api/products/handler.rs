//! Product catalog API handlers
//!
//! Create and update accept `multipart/form-data` because they carry the
//! product image alongside the scalar fields. The multipart extractors are
//! thin: they collect the form into a typed struct and hand off to the
//! `apply_*` functions, which hold all the business rules.

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::db::models::{Product, ProductCreate, ProductSummary, ProductUpdate};
use crate::db::repository::product;
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::utils::validation::{
    MAX_DESCRIPTION_LEN, MAX_NAME_LEN, validate_optional_text, validate_required_text,
};

/// An uploaded image part: original filename plus payload
type Upload = (String, Vec<u8>);

/// Collected multipart form for create/update. Every field is optional at
/// the parse stage; requiredness is enforced per operation.
#[derive(Default)]
struct ProductForm {
    name: Option<String>,
    points: Option<i64>,
    description: Option<String>,
    active: Option<bool>,
    image: Option<Upload>,
}

async fn collect_form(mut multipart: Multipart) -> AppResult<ProductForm> {
    let mut form = ProductForm::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "name" => form.name = Some(field.text().await?),
            "points" => {
                let raw = field.text().await?;
                let points = raw.trim().parse::<i64>().map_err(|_| {
                    AppError::Validation("points must be a positive integer".into())
                })?;
                form.points = Some(points);
            }
            "description" => {
                let text = field.text().await?;
                if !text.trim().is_empty() {
                    form.description = Some(text);
                }
            }
            "active" => {
                let raw = field.text().await?;
                form.active = Some(matches!(raw.trim(), "true" | "1"));
            }
            "image" => {
                let filename = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| AppError::Validation("Image is required".into()))?;
                let data = field.bytes().await?;
                if !data.is_empty() {
                    form.image = Some((filename, data.to_vec()));
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

#[derive(Deserialize)]
pub struct CatalogQuery {
    pub name: Option<String>,
    pub code: Option<i64>,
}

/// GET /api/products — active catalog, cheapest first
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> AppResult<Json<Vec<ProductSummary>>> {
    let name = query.name.as_deref().filter(|n| !n.trim().is_empty());
    let products = product::list(&state.pool, name, query.code).await?;
    Ok(Json(products))
}

/// POST /api/products — create a product from a multipart form. The image
/// is stored first; only a persisted image URI ever reaches the row.
pub async fn create(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<Product>> {
    let form = collect_form(multipart).await?;
    apply_create(&state, form).await.map(Json)
}

async fn apply_create(state: &AppState, form: ProductForm) -> AppResult<Product> {
    let name = form
        .name
        .ok_or_else(|| AppError::Validation("name must not be empty".into()))?;
    validate_required_text(&name, "name", MAX_NAME_LEN)?;

    let points = form
        .points
        .ok_or_else(|| AppError::Validation("points must be a positive integer".into()))?;
    validate_optional_text(&form.description, "description", MAX_DESCRIPTION_LEN)?;

    let (filename, data) = form
        .image
        .ok_or_else(|| AppError::Validation("Image is required".into()))?;
    let image = state.images.save(&filename, &data).await?;

    let created = product::create(
        &state.pool,
        ProductCreate {
            name,
            points,
            description: form.description,
            image,
        },
    )
    .await?;

    Ok(created)
}

/// PATCH /api/products/:id — partial update from a multipart form. Omitted
/// fields keep their stored values; a new image replaces the old URI.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<Json<Product>> {
    let form = collect_form(multipart).await?;
    apply_update(&state, &id, form).await.map(Json)
}

async fn apply_update(state: &AppState, id: &str, form: ProductForm) -> AppResult<Product> {
    if let Some(name) = &form.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&form.description, "description", MAX_DESCRIPTION_LEN)?;

    let image = match form.image {
        Some((filename, data)) => Some(state.images.save(&filename, &data).await?),
        None => None,
    };

    let updated = product::update(
        &state.pool,
        id,
        ProductUpdate {
            name: form.name,
            points: form.points,
            description: form.description,
            image,
            active: form.active,
        },
    )
    .await?;

    Ok(updated)
}

/// DELETE /api/products/:id — soft delete. The row survives for historical
/// redeems; it just leaves the catalog.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    if !product::deactivate(&state.pool, &id).await? {
        return Err(AppError::NotFound("Product not found".into()));
    }
    Ok(Json(json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use std::io::Cursor;

    async fn test_state() -> AppState {
        let dir = tempfile::tempdir().unwrap();
        AppState::for_tests(test_pool().await, dir.keep()).await
    }

    fn png_upload(name: &str) -> Upload {
        let img = image::RgbImage::new(2, 2);
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
            .unwrap();
        (name.into(), buffer)
    }

    fn create_form(name: &str, points: i64) -> ProductForm {
        ProductForm {
            name: Some(name.into()),
            points: Some(points),
            image: Some(png_upload("foto.png")),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_stores_image_and_row() {
        let state = test_state().await;
        let product = apply_create(&state, create_form("Caneca", 100))
            .await
            .unwrap();

        assert_eq!(product.points, 100);
        assert!(product.image.starts_with("/images/"));
        assert!(product.active);
    }

    #[tokio::test]
    async fn test_create_requires_image() {
        let state = test_state().await;
        let form = ProductForm {
            image: None,
            ..create_form("Caneca", 100)
        };

        let err = apply_create(&state, form).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == "Image is required"));
    }

    #[tokio::test]
    async fn test_create_rejects_bad_image_before_insert() {
        let state = test_state().await;
        let form = ProductForm {
            image: Some(("fake.png".into(), b"not a png".to_vec())),
            ..create_form("Caneca", 100)
        };

        assert!(apply_create(&state, form).await.is_err());
        assert!(product::list(&state.pool, None, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_keeps_omitted_fields() {
        let state = test_state().await;
        let created = apply_create(&state, create_form("Caneca", 100))
            .await
            .unwrap();

        let updated = apply_update(
            &state,
            &created.id,
            ProductForm {
                points: Some(250),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.points, 250);
        assert_eq!(updated.name, "Caneca");
        assert_eq!(updated.image, created.image);
    }

    #[tokio::test]
    async fn test_update_unknown_product() {
        let state = test_state().await;
        let err = apply_update(&state, "missing", ProductForm::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_remove_hides_from_catalog() {
        let state = test_state().await;
        let created = apply_create(&state, create_form("Caneca", 100))
            .await
            .unwrap();

        remove(State(state.clone()), Path(created.id.clone()))
            .await
            .unwrap();
        assert!(product::list(&state.pool, None, None).await.unwrap().is_empty());

        // Soft delete: a second pass finds nothing active to flip
        let err = remove(State(state), Path(created.id)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
