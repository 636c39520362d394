//! Tracing subscriber setup for binaries and tests embedding the gate

/// Install a fmt subscriber filtered by `RUST_LOG`, falling back to a level
/// picked from `verbosity` (0 = warn, 1 = info, 2 = debug, 3+ = trace).
///
/// Safe to call more than once; only the first call installs anything.
/// Returns whether this call installed the subscriber.
pub fn init(verbosity: u8) -> bool {
    // hyper and reqwest are chatty at debug
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbosity {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info,hyper=warn,reqwest=warn"),
            2 => tracing_subscriber::EnvFilter::new("debug,hyper=warn,reqwest=warn"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok()
}
