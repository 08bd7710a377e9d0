use tracing_subscriber::EnvFilter;

/// Initialise logging. The default level is `info`; when debug logging is
/// enabled the level drops to `debug` and `RUST_LOG` may override it.
pub fn init(debug: bool) {
    let level = if debug { "debug" } else { "info" };

    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        // Force `info` so a stray RUST_LOG in the environment cannot make
        // the bridge chatty on its stdout transport channel.
        EnvFilter::new(level)
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
