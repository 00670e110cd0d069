//! Telemetry and observability setup
//!
//! Configures structured logging with tracing and tracing-subscriber.

use std::sync::Once;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Filter directives used when RUST_LOG is not set
pub fn default_directives(level: &str) -> String {
    format!("actionloop={},tower_http=debug", level)
}

/// Initialize tracing subscriber for structured logging
///
/// Only the first call per process has an effect. If another global
/// subscriber is already installed (e.g. by a test harness) it is left alone.
///
/// Reads the filter from RUST_LOG, defaulting to `default_level` for this crate.
///
/// # Examples
///
/// ```no_run
/// actionloop::telemetry::init("info");
/// tracing::info!("Runtime started");
/// ```
pub fn init(default_level: &str) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directives(default_level)));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init();
    });
}
