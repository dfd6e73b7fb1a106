//! Installs the process-wide log subscriber for the binaries.
//!
//! With the `tracing` feature the `tracing_subscriber` registry is used,
//! filtered by `RUST_LOG`, and `log` records are bridged into it.
//! Without it, `env_logger` reads the same variable.
//!
//! ```bash
//! RUST_LOG=footfall=debug,tower_http=info
//! ```

/// Initialises logging. Calling this more than once is a no-op.
#[cfg(feature = "tracing")]
pub fn initialize_tracer() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let fmt_layer = tracing_subscriber::fmt::layer();

    // `try_init` also installs the `log` -> `tracing` bridge.
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(fmt_layer)
        .try_init();
}

/// Initialises logging. Calling this more than once is a no-op.
#[cfg(not(feature = "tracing"))]
pub fn initialize_tracer() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
