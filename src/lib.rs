//! pontos-server — loyalty points portal backend
//!
//! Small HTTP service for a store loyalty program:
//!
//! - **Users** (`db::repository::user`): registry keyed by CPF/CNPJ document
//! - **Ledger** (`db::repository::{order, redeem, ledger}`): append-only
//!   point grants and debits; the balance is always derived, never stored
//! - **Catalog** (`db::repository::product`): redeemable products with
//!   soft delete and point-cost snapshots
//! - **HTTP API** (`api`): axum routes returning camelCase JSON
//!
//! # Module structure
//!
//! ```text
//! src/
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # Pool setup, migrations, models, repositories
//! ├── services/      # Image storage
//! ├── utils/         # Validation helpers
//! ├── config.rs      # Environment configuration
//! ├── error.rs       # AppError + HTTP mapping
//! ├── logger.rs      # tracing setup
//! └── state.rs       # Shared AppState
//! ```

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod logger;
pub mod services;
pub mod state;
pub mod utils;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;
