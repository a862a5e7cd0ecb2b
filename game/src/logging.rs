use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the fmt subscriber for binaries. `filter` uses `EnvFilter` syntax,
/// e.g. `info` or `qblock_engine=debug`. A second call is a no-op.
pub fn init_tracing(filter: &str) {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
