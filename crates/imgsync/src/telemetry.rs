use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `imgsync_sync=debug`.
pub const LOG_ENV: &str = "IMGSYNC_LOG";

/// Log to stderr so stdout stays free for hook output and JSON results.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
