//! Process-wide logging: timestamped, leveled lines on stdout via tracing-subscriber.
//!
//! `RUST_LOG` takes precedence over the level chosen from the CLI flags.

use tracing_subscriber::{fmt::time::ChronoLocal, EnvFilter};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Filter directive for the given CLI flags. `quiet` wins over `verbose`.
pub fn level_directive(quiet: bool, verbose: bool) -> &'static str {
    if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(default_directive: &str) -> Result<(), String> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_string()))
        .with_target(false)
        .with_writer(std::io::stdout)
        .try_init()
        .map_err(|e| format!("Failed to initialize logging: {}", e))
}
