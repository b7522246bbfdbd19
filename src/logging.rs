//! Tracing subscriber setup for binaries and tests embedding the loader.

use tracing_subscriber::EnvFilter;

/// Default filter for a verbosity level: 0 → info, 1 → debug, 2+ → trace.
pub fn default_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Install a human-readable stderr subscriber.
///
/// `RUST_LOG` wins over `verbosity` when set. Installing twice is harmless; the second call is
/// ignored.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
