//! Log output for hosts that do not install their own subscriber.

use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Installs a compact fmt subscriber writing to stderr at `level` (e.g.
/// `"info"`, `"debug"`).
/// `RUST_LOG` takes precedence when set.
///
/// Returns false if a global subscriber was already installed.
pub fn init(level: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .is_ok()
}
