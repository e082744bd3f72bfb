use tracing_subscriber::{fmt, EnvFilter};

const FALLBACK_FILTER: &str = "info";

/// Install the global fmt subscriber. Later calls are no-ops.
///
/// `filter` uses `EnvFilter` syntax, e.g. `"aquamonitor_core=debug"`; an
/// unparseable filter falls back to `info`.
pub fn init(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(FALLBACK_FILTER));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}
