//! Setup and initialization functions for CLI
//!
//! Logging is configured here and only here; the library never installs a
//! subscriber.

use tracing_subscriber::EnvFilter;

/// Map `-v` occurrences to a default filter directive.
pub fn default_log_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Install the global tracing subscriber. `RUST_LOG` overrides `-v`.
///
/// `log` records (emitted by the config loader) are bridged into tracing.
pub fn init_logging(verbosity: u8, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(verbosity)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if let Err(e) = result {
        // Already configured - this is fine, just ignore
        eprintln!("Note: logging already configured: {}", e);
    }
}
