//! Logging and tracing setup.
//!
//! The library only emits `tracing` events; frontends call one of the init
//! functions once at startup. Output goes to stderr so query results on stdout
//! stay machine-readable.

use std::sync::Once;

use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::db::LoggingConfig;

static INIT: Once = Once::new();

const DEFAULT_FILTER: &str = "warn";

fn env_filter(directive: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directive.unwrap_or(DEFAULT_FILTER)))
}

/// Initialize the global subscriber with human-readable output.
///
/// Subsequent calls are ignored.
pub fn init_tracing(directive: Option<&str>) {
    INIT.call_once(|| {
        let fmt_layer = fmt::layer().with_writer(std::io::stderr).with_target(true);
        tracing_subscriber::registry().with(env_filter(directive)).with(fmt_layer).init();
        info!("unidis tracing initialized");
    });
}

/// Initialize the global subscriber with JSON lines.
pub fn init_tracing_json(directive: Option<&str>) {
    INIT.call_once(|| {
        let fmt_layer = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_current_span(true);
        tracing_subscriber::registry().with(env_filter(directive)).with(fmt_layer).init();
        info!("unidis tracing initialized (JSON mode)");
    });
}

/// Initialize from a [`LoggingConfig`].
pub fn init_from_config(config: &LoggingConfig) {
    if config.json {
        init_tracing_json(config.filter.as_deref());
    } else {
        init_tracing(config.filter.as_deref());
    }
}
