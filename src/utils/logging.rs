//! Structured logging setup.
//!
//! Builds a `tracing` subscriber from [`LoggingConfig`]. `RUST_LOG` takes
//! precedence over the configured level so operators can override without
//! touching config files.

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;

/// Install the global tracing subscriber.
///
/// Safe to call more than once; later calls are no-ops (first subscriber
/// wins), which keeps tests that share a process from fighting over it.
pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.clone()));

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(config.include_target);

    let _ = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
