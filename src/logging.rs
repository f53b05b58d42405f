//! Logging setup
//!
//! Subscriber initialization for test binaries using the default main. User
//! code that installs its own subscriber first wins; later calls are no-ops.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Parse a log level name, accepting the usual spellings.
pub fn parse_level(s: &str) -> Option<Level> {
    match s.to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" | "warning" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

/// Initialize the global subscriber for this crate's diagnostics.
pub fn init(level: &str) {
    let level = parse_level(level).unwrap_or(Level::WARN);
    let filter = EnvFilter::new(format!("veritest={level}"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();
}
