//! Product model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Redeemable catalog item.
///
/// Products are never physically deleted — historical redeems reference
/// them — so "delete" flips `active` off. `code` is a small auto-assigned
/// integer used for counter-side lookup, distinct from the opaque `id`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub points: i64,
    pub description: Option<String>,
    pub image: String,
    pub active: bool,
    pub code: i64,
    pub created_at: DateTime<Utc>,
}

/// Create product payload (assembled from the multipart form)
#[derive(Debug, Clone)]
pub struct ProductCreate {
    pub name: String,
    pub points: i64,
    pub description: Option<String>,
    pub image: String,
}

/// Partial update payload. Only supplied fields are applied; omitted fields
/// are never cleared.
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub points: Option<i64>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub active: Option<bool>,
}

/// Catalog listing projection with the redeem count
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: String,
    pub name: String,
    pub points: i64,
    pub description: Option<String>,
    pub image: String,
    pub code: i64,
    pub created_at: DateTime<Utc>,
    pub redeem_count: i64,
}
