//! Structured logging initialization.

use crate::error::{TelemetryError, TelemetryResult};
use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Filter directives used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Force JSON output even outside production.
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info,tide=debug".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
        }
    }
}

impl TelemetryConfig {
    /// JSON when configured, or when `RUST_ENV=production`.
    pub fn use_json(&self) -> bool {
        self.json
            || std::env::var("RUST_ENV")
                .map(|v| v == "production")
                .unwrap_or(false)
    }
}

/// Initialize structured logging.
///
/// `RUST_LOG` overrides the configured level. Output goes to stderr so the
/// replay driver can keep stdout for diagnostics frames.
pub fn init_logging(config: &TelemetryConfig) -> TelemetryResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;

    if config.use_json() {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(true)
                    .with_span_list(true),
            )
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TelemetryConfig::default();
        assert_eq!(config.log_level, "info,tide=debug");
        assert!(!config.json);
    }

    #[test]
    fn test_parse_partial_config() {
        let config: TelemetryConfig = toml::from_str("json = true").unwrap();
        assert!(config.json);
        assert!(config.use_json());
        assert_eq!(config.log_level, "info,tide=debug");
    }
}
