//! Console tracing setup for binaries and tests embedding the engine.
//!
//! The library itself only emits `tracing` events; installing a subscriber
//! is left to the caller.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Installs a stderr subscriber filtered by `RUST_LOG`, falling back to
/// `default_level`.
///
/// Unknown levels fall back to `info`. Returns false when a global
/// subscriber was already installed.
pub fn try_init(default_level: &str) -> bool {
    let level = default_level.trim().to_ascii_lowercase();
    let directive = if LEVELS.contains(&level.as_str()) {
        level.parse().unwrap_or(LevelFilter::INFO)
    } else {
        LevelFilter::INFO
    };

    let filter = EnvFilter::builder()
        .with_default_directive(directive.into())
        .parse_lossy(std::env::var("RUST_LOG").unwrap_or_default());

    let installed = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_filter(filter))
        .try_init()
        .is_ok();
    if installed && directive == LevelFilter::INFO && level != "info" {
        tracing::warn!(requested = %default_level, "invalid log level, defaulting to info");
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_reports_existing_subscriber() {
        let _ = try_init("debug");
        assert!(!try_init("bogus"));
    }
}
