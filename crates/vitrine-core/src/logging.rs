//! Logging initialization for the client core.
//!
//! The embedding shell calls [`init_logging`] once at startup; every crate in
//! the workspace logs through `tracing` macros with structured fields.

use tracing_subscriber::EnvFilter;

/// Options for the global tracing subscriber.
#[derive(Debug, Clone)]
pub struct LogOptions {
    /// Default log level when RUST_LOG is unset (trace, debug, info, warn, error).
    pub default_level: String,
    /// Emit JSON lines instead of the compact human-readable format.
    pub json: bool,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            default_level: "info".to_string(),
            json: false,
        }
    }
}

/// Install the global tracing subscriber.
///
/// Log level comes from the RUST_LOG env var when set, otherwise from
/// `options.default_level`. Returns false when a subscriber was already
/// installed (e.g. by the embedding shell or a previous call).
pub fn init_logging(options: &LogOptions) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&options.default_level));

    if options.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init()
            .is_ok()
    } else {
        tracing_subscriber::fmt()
            .compact()
            .with_target(true)
            .with_env_filter(filter)
            .try_init()
            .is_ok()
    }
}

/// Parse a log level string into a tracing Level.
pub fn parse_level(level: &str) -> tracing::Level {
    match level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" | "warning" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    }
}
