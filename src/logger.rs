//! Logging infrastructure
//!
//! Structured logging setup for development (stdout) and production
//! (daily rolling files under `LOG_DIR`).

use tracing_subscriber::EnvFilter;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pontos_server=info,tower_http=info".into())
}

/// Initialize the logger, optionally writing to a daily rolling file
pub fn init_logger(log_dir: Option<&str>) -> anyhow::Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false);

    let result = if let Some(dir) = log_dir {
        let file_appender = tracing_appender::rolling::daily(dir, "pontos-server");
        subscriber
            .with_writer(file_appender)
            .with_ansi(false)
            .try_init()
    } else {
        subscriber.try_init()
    };

    result.map_err(|e| anyhow::anyhow!("Failed to initialize logger: {e}"))
}
