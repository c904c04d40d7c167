//! Server configuration
//!
//! All settings can be overridden through environment variables:
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | WORK_DIR | ./data | Working directory (database, stored images, logs) |
//! | HTTP_PORT | 3000 | HTTP API port |
//! | DATABASE_PATH | {WORK_DIR}/pontos.db | SQLite database file |
//! | ENVIRONMENT | development | development \| staging \| production |
//! | IMAGE_STORE | local | Image store backend (only `local` is implemented) |
//! | REQUIRE_SUFFICIENT_BALANCE | false | Reject redemptions that exceed the balance |
//! | LOG_DIR | (unset) | Directory for daily rolling log files |

use std::path::PathBuf;

/// Loyalty portal configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for database, images and logs
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// SQLite database file path
    pub database_path: String,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Image store backend selector
    pub image_store: String,
    /// Whether a redemption must be covered by the current balance.
    /// The reference behavior is to always allow, so this defaults to false.
    pub require_balance: bool,
    /// Optional log directory for rolling file output
    pub log_dir: Option<String>,
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into());
        let database_path = std::env::var("DATABASE_PATH")
            .unwrap_or_else(|_| format!("{work_dir}/pontos.db"));

        Self {
            work_dir,
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            database_path,
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            image_store: std::env::var("IMAGE_STORE").unwrap_or_else(|_| "local".into()),
            require_balance: std::env::var("REQUIRE_SUFFICIENT_BALANCE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
        }
    }

    /// Override the filesystem-dependent settings; used by tests
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.database_path = format!("{}/pontos.db", config.work_dir);
        config.http_port = http_port;
        config
    }

    /// Directory where uploaded product images are stored
    pub fn images_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("public/images")
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
