//! Tracing subscriber setup shared by the binaries

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber
///
/// `RUST_LOG` wins when set, otherwise `default_level` applies. Output goes
/// to stderr so that stdout stays free for machine-readable results.
/// Calling this more than once is harmless.
pub fn init_tracing(default_level: Level) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.to_string().to_lowercase()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
