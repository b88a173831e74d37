//! Tracing setup
//!
//! Logs go to stderr so stdout stays clean for `--json` consumers.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Filter used when RUST_LOG is unset (trace|debug|info|warn|error|off)
    pub log_level: String,
    pub ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            ansi: true,
        }
    }
}

impl LogConfig {
    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.log_level))
    }
}

/// Install the global subscriber. Returns false if one was already set.
pub fn init_tracing(config: &LogConfig) -> bool {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_ansi(config.ansi);

    Registry::default()
        .with(config.env_filter())
        .with(stderr_layer)
        .try_init()
        .is_ok()
}
