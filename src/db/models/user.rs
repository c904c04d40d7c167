//! User model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User entity. Immutable after creation; only its ledger history grows.
///
/// `document` is the CPF/CNPJ natural key, stored digits-only (11 or 14
/// digits). Any mask is presentation-only and stripped before persistence.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub document: String,
    pub created_at: DateTime<Utc>,
}

/// Create user payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCreate {
    pub name: String,
    pub document: String,
}

/// User projection with the derived point balance.
///
/// `points` is computed from the unexpired ledger rows at query time and is
/// never a stored column.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserWithPoints {
    pub id: String,
    pub name: String,
    pub document: String,
    pub created_at: DateTime<Utc>,
    pub points: i64,
}
