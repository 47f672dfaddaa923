use once_cell::sync::Lazy;
use tracing_subscriber::EnvFilter;

/// Set when `STATUSLINE_DEBUG` is present in the environment
pub static DEBUG_MODE: Lazy<bool> = Lazy::new(|| std::env::var("STATUSLINE_DEBUG").is_ok());

/// Log filter: debug when asked for, else `RUST_LOG`, else warnings only
pub fn log_filter(debug: bool) -> EnvFilter {
    if debug || *DEBUG_MODE {
        EnvFilter::new("statusline=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("statusline=warn"))
    }
}

/// Install the stderr subscriber; stdout is reserved for the status line
pub fn init_logging(debug: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(debug))
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init()
        .ok();
}
