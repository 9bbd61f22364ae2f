use tracing_subscriber::EnvFilter;

/// Install a formatting subscriber for the profiler's log output
///
/// `RUST_LOG` takes precedence over `default_filter`. Returns false when a global
/// subscriber was already installed.
pub fn init_tracing(default_filter: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt().with_env_filter(filter).try_init().is_ok()
}
