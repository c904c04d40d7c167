//! Repository module
//!
//! Function-style data access over the SQLite pool, one module per table,
//! plus [`ledger`] for the cross-table balance and expiration operations.

pub mod ledger;
pub mod order;
pub mod product;
pub mod redeem;
pub mod user;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                RepoError::Duplicate(db_err.to_string())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Clamp a 1-based page number and compute the row offset
pub(crate) fn page_offset(page: i64, page_size: i64) -> i64 {
    (page.max(1) - 1) * page_size
}
