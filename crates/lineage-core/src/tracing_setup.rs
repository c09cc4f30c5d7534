//! Tracing initialization.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::ObservabilityConfig;

static INIT: Once = Once::new();

/// Environment variable holding per-target filter directives,
/// e.g. `LINEAGE_LOG=lineage_storage=debug,lineage_graph=info`.
pub const LOG_ENV_VAR: &str = "LINEAGE_LOG";

/// Initialize the global subscriber. Idempotent.
///
/// Reads `LINEAGE_LOG`; falls back to `info`.
pub fn init_tracing() {
    init_with_fallback("info");
}

/// Initialize using the configured log level as the fallback filter.
pub fn init_tracing_from_config(config: &ObservabilityConfig) {
    init_with_fallback(&config.log_level);
}

/// Initialize with an explicit filter string, ignoring the environment.
pub fn init_tracing_with_filter(filter: &str) {
    let filter = EnvFilter::new(filter);
    INIT.call_once(|| {
        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_target(true))
            .with(filter)
            .try_init();
    });
}

fn init_with_fallback(fallback: &str) {
    let filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(fallback));
    INIT.call_once(|| {
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
