//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging helpers
//! for the EventHub backend.

use crate::config::LoggingConfig;
use crate::utils::errors::Result;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging based on configuration. The returned guard flushes the
/// file writer on drop and must be held for the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "eventhub.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log best-effort cleanup failures (never fatal to the operation)
pub fn log_cleanup_failure(event_id: i64, target: &str, error: &str) {
    warn!(
        event_id = event_id,
        target = target,
        error = error,
        "Cleanup step failed, continuing"
    );
}
