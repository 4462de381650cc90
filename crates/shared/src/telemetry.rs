//! Tracing subscriber setup for binaries and tools embedding the core.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LogConfig;

/// Installs a global fmt subscriber.
///
/// `RUST_LOG` wins over the configured filter. Calling this twice is harmless: the
/// second attempt is ignored and `false` is returned.
pub fn init(log: &LogConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log.filter.as_str()));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}
