//! `skukit_log` v1:
//! `tracing` subscriber setup shared by the skukit entry points.

use tracing_subscriber::EnvFilter;

/// Environment variable read for the log filter.
pub const C_ENV_LOG_FILTER: &str = "SKUKIT_LOG";
/// Filter used when [`C_ENV_LOG_FILTER`] is unset or invalid.
pub const C_LOG_FILTER_DEFAULT: &str = "skukit=info";

/// Build the filter from `SKUKIT_LOG`, falling back to `default_directive`.
pub fn derive_env_filter(default_directive: Option<&str>) -> EnvFilter {
    let c_default = default_directive.unwrap_or(C_LOG_FILTER_DEFAULT);
    EnvFilter::try_from_env(C_ENV_LOG_FILTER).unwrap_or_else(|_| EnvFilter::new(c_default))
}

/// Install a global fmt subscriber writing to stderr.
///
/// Returns `false` when a global subscriber was already installed (the call is
/// then a no-op), so embedding hosts may call it more than once.
pub fn init_logging(default_directive: Option<&str>) -> bool {
    let if_installed = tracing_subscriber::fmt()
        .with_env_filter(derive_env_filter(default_directive))
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .is_ok();
    if if_installed {
        tracing::debug!("skukit logging initialized");
    }
    if_installed
}
