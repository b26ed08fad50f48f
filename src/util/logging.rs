// dashtime - util/logging.rs
//
// tracing subscriber setup for the CLI.
//
// Level sources, highest priority first:
//   1. RUST_LOG (full EnvFilter directive syntax)
//   2. --debug on the command line
//   3. [logging] level in config.toml
//   4. DEFAULT_LOG_LEVEL
//
// Output: stderr, so stdout stays clean for command results.

use super::constants::{APP_NAME, APP_VERSION, DEFAULT_LOG_LEVEL};
use tracing_subscriber::EnvFilter;

/// Pick the filter directive from the available level sources.
fn directive(rust_log: Option<String>, debug_flag: bool, config_level: Option<&str>) -> String {
    match (rust_log, debug_flag, config_level) {
        (Some(env), _, _) => env,
        (None, true, _) => "debug".to_string(),
        (None, false, Some(level)) => level.to_lowercase(),
        (None, false, None) => DEFAULT_LOG_LEVEL.to_string(),
    }
}

/// Install the global subscriber. Safe to call more than once; later calls
/// leave the first subscriber in place.
pub fn init(debug_flag: bool, config_level: Option<&str>) {
    let rust_log = std::env::var("RUST_LOG").ok().filter(|v| !v.is_empty());
    let directive = directive(rust_log, debug_flag, config_level);
    let filter = EnvFilter::try_new(&directive)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(app = APP_NAME, version = APP_VERSION, %directive, "Logging initialised");
    }
}
