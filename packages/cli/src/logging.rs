//! Logging setup
//!
//! Maps the plugin's log level names onto a `tracing` filter. `RUST_LOG`
//! takes precedence when set so individual modules can be tuned.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Map a plugin log level name to a filter level
///
/// `FATAL` has no `tracing` counterpart and maps to `ERROR`. Unknown names
/// fall back to `INFO`.
pub fn parse_log_level(level: &str) -> LevelFilter {
    match level.trim().to_ascii_uppercase().as_str() {
        "TRACE" => LevelFilter::TRACE,
        "DEBUG" => LevelFilter::DEBUG,
        "INFO" => LevelFilter::INFO,
        "WARN" | "WARNING" => LevelFilter::WARN,
        "ERROR" | "FATAL" | "PANIC" => LevelFilter::ERROR,
        _ => LevelFilter::INFO,
    }
}

/// Install the global subscriber, writing to stderr
pub fn init(level: &str) {
    let level = parse_log_level(level);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    // A subscriber may already exist when embedded; keep it
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
