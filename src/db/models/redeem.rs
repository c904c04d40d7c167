//! Redeem model (a point debit event)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recorded redemption that debits points for a catalog product.
///
/// `points` is a snapshot of the product's cost at redemption time, so
/// later catalog edits never alter historical debits.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Redeem {
    pub id: String,
    pub user_id: String,
    pub product_id: String,
    pub points: i64,
    pub created_at: DateTime<Utc>,
    pub expired_at: Option<DateTime<Utc>>,
}

/// Create redeem payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemCreate {
    pub user_id: String,
    pub product_id: String,
}

/// Redeem listing projection with user and product names
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RedeemWithRelations {
    pub id: String,
    pub user_id: String,
    pub product_id: String,
    pub points: i64,
    pub created_at: DateTime<Utc>,
    pub expired_at: Option<DateTime<Utc>>,
    pub user_name: String,
    pub product_name: String,
}

/// Ledger entry as shown on the per-user detail page
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RedeemEntry {
    pub points: i64,
    pub created_at: DateTime<Utc>,
    pub expired_at: Option<DateTime<Utc>>,
    pub product_name: String,
}
