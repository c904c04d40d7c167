//! Order model (a point grant event)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recorded purchase that grants points.
///
/// Immutable once written, except for the one-time transition of
/// `expired_at` from null to the sweep timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub points: i64,
    pub created_at: DateTime<Utc>,
    pub expired_at: Option<DateTime<Utc>>,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    pub user_id: String,
    pub points: i64,
}

/// Order listing projection with owner info
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderWithUser {
    pub id: String,
    pub points: i64,
    pub created_at: DateTime<Utc>,
    pub expired_at: Option<DateTime<Utc>>,
    pub user_name: String,
    pub user_document: String,
}

/// Ledger entry as shown on the per-user detail page
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderEntry {
    pub points: i64,
    pub created_at: DateTime<Utc>,
    pub expired_at: Option<DateTime<Utc>>,
}
