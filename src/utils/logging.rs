//! Tracing subscriber initialization
//!
//! The core itself only emits `tracing` events; wiring them to an output
//! is left to the embedding application, which can call this helper once
//! at startup.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize logging with the given filter directive and format.
///
/// `format` is `"json"` for machine-readable output, anything else for
/// compact human-readable lines. The directive falls back to `info` if it
/// does not parse.
pub fn init_logging(level: &str, format: &str) {
    let env_filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        "json" => {
            let fmt_layer = fmt::layer().json().with_target(true);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .init();
        }
        _ => {
            let fmt_layer = fmt::layer().with_target(false);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .init();
        }
    }
}
