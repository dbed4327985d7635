//! Logging setup for host apps.

use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

static INSTALLED: OnceLock<bool> = OnceLock::new();

/// Install a fmt subscriber filtered by `filter` (e.g. "farmai_core=debug").
///
/// Falls back to `RUST_LOG`, then "info", when the filter is empty or
/// invalid. Only the first call has an effect; returns whether this process
/// ended up with our subscriber installed.
pub fn init_logging(filter: &str) -> bool {
    *INSTALLED.get_or_init(|| {
        let filter = EnvFilter::try_new(filter)
            .ok()
            .filter(|_| !filter.trim().is_empty())
            .or_else(|| EnvFilter::try_from_default_env().ok())
            .unwrap_or_else(|| EnvFilter::new("info"));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
            .is_ok()
    })
}
