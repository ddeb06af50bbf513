//! Logging and tracing initialization.

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;

/// Level used when `--verbose` is passed on the command line.
pub const VERBOSE_LEVEL: &str = "debug";

/// Initialize the tracing subscriber with the given configuration.
///
/// `RUST_LOG` takes precedence over the configured level. Returns `false`
/// if a global subscriber was already installed.
pub fn init_logging(config: &LoggingConfig) -> bool {
    let env_filter = env_filter(&config.level);

    let installed = if config.json {
        fmt()
            .with_env_filter(env_filter)
            .json()
            .with_current_span(false)
            .try_init()
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_names(true)
            .compact()
            .try_init()
    };

    installed.is_ok()
}

/// Initialize logging, raising the level to debug when `verbose` is set.
pub fn init_logging_with_verbosity(config: &LoggingConfig, verbose: bool) -> bool {
    if verbose {
        let mut config = config.clone();
        config.level = VERBOSE_LEVEL.to_string();
        init_logging(&config)
    } else {
        init_logging(config)
    }
}

/// Route logs through the libtest capture so they show up on failing tests.
pub fn init_test_logging() {
    let _ = fmt()
        .with_env_filter(env_filter("debug"))
        .with_test_writer()
        .try_init();
}

fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}
