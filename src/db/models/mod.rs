//! Data models
//!
//! Entity structs, create/update payloads and joined projections.
//! JSON uses camelCase field names and ISO-8601 timestamps; the database
//! columns keep the snake_case names sqlx maps from.

pub mod order;
pub mod product;
pub mod redeem;
pub mod user;

pub use order::{Order, OrderCreate, OrderEntry, OrderWithUser};
pub use product::{Product, ProductCreate, ProductSummary, ProductUpdate};
pub use redeem::{Redeem, RedeemCreate, RedeemEntry, RedeemWithRelations};
pub use user::{User, UserCreate, UserWithPoints};

use serde::Serialize;

/// Offset-paginated list envelope.
///
/// Carries an explicit total so callers never have to infer "has more"
/// from a full page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total: i64, page: i64, page_size: i64) -> Self {
        Self {
            items,
            total,
            page,
            page_size,
        }
    }
}
