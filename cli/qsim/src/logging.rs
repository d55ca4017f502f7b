//! Log subscriber setup.

use tracing_subscriber::EnvFilter;

/// Level directive from `-v` flags, then the configured level, then `warn`.
pub fn level_directive(verbose: u8, configured: Option<&str>) -> String {
    match verbose {
        0 => configured.unwrap_or("warn").to_string(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Install the global subscriber, writing to stderr. `RUST_LOG` wins over
/// everything else.
pub fn init(verbose: u8, configured: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_directive(verbose, configured)));
    // A second init (e.g. from tests) leaves the first subscriber in place.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
