//! Logging setup.
//!
//! Logs go to stderr; stdout is reserved for JSON results.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::ports::config_port::ConfigPort;

pub const DEFAULT_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: String,
    pub json: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL.to_string(),
            json: false,
        }
    }
}

impl LogSettings {
    /// `[logging] level` plus `json = true` or `format = json`, with
    /// command-line values taking precedence.
    pub fn resolve(config: &dyn ConfigPort, level: Option<&str>, json: bool) -> Self {
        let level = level
            .map(str::to_string)
            .or_else(|| config.get_string("logging", "level"))
            .unwrap_or_else(|| DEFAULT_LEVEL.to_string());
        let json = json
            || config.get_bool("logging", "json", false)
            || config
                .get_string("logging", "format")
                .is_some_and(|f| f.trim().eq_ignore_ascii_case("json"));
        Self { level, json }
    }
}

/// Install the global subscriber. `RUST_LOG` wins over `settings.level`.
/// Later calls are no-ops.
pub fn init(settings: &LogSettings) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.level));

    let result = if settings.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };

    if result.is_err() {
        tracing::debug!("subscriber already installed");
    }
}
