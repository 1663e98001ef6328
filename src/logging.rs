//! Log output for the binary. The library only emits `tracing` events.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding the filter directives, e.g. `debug` or
/// `script_lens::runner=trace`.
pub const LOG_ENV: &str = "SCRIPT_LENS_LOG";

pub const DEFAULT_FILTER: &str = "info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber writing to stderr, as JSON lines when
/// `json` is set and compact text otherwise. A second call is a no-op.
pub fn init(json: bool) {
    let json_layer = if json {
        Some(
            fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false),
        )
    } else {
        None
    };
    let pretty_layer = if json {
        None
    } else {
        Some(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
    };

    let result = tracing_subscriber::registry()
        .with(env_filter())
        .with(json_layer)
        .with(pretty_layer)
        .try_init();
    if result.is_ok() {
        tracing::debug!(json, "Logging initialized");
    }
}
