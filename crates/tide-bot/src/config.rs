//! Application configuration.

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tide_mm::StrategyTable;
use tide_telemetry::{DiagnosticsConfig, TelemetryConfig};

/// Default config location, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Environment variable overriding the config path.
pub const CONFIG_ENV_VAR: &str = "TIDE_CONFIG";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Instrument → policy table.
    #[serde(default)]
    pub strategy: StrategyTable,

    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration, preferring `path` over `TIDE_CONFIG` over the
    /// default path. A missing file falls back to defaults.
    pub fn load_with(path: Option<&str>) -> AppResult<Self> {
        let config_path = Self::resolve_path(path);

        if Path::new(&config_path).exists() {
            Self::from_file(&config_path)
        } else {
            tracing::warn!(path = %config_path, "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Config path resolution: explicit > `TIDE_CONFIG` > default.
    pub fn resolve_path(path: Option<&str>) -> String {
        path.map(str::to_string)
            .or_else(|| std::env::var(CONFIG_ENV_VAR).ok())
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tide_core::{Price, Quantity, Symbol};
    use tide_mm::PolicyConfig;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.diagnostics.max_log_length, 3750);
        assert_eq!(config.strategy.instruments.len(), 3);
        assert!(!config.telemetry.json);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[diagnostics]
max_log_length = 2000

[telemetry]
log_level = "warn"

[strategy]
default_policy = {{ kind = "idle" }}

[strategy.instruments.RAINFOREST_RESIN]
limit = 40
policy = {{ kind = "pegged", buy_peg = 9998, sell_peg = 10002 }}
"#
        )
        .unwrap();

        let config = AppConfig::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.diagnostics.max_log_length, 2000);
        assert_eq!(config.telemetry.log_level, "warn");
        assert_eq!(config.strategy.default_policy, PolicyConfig::Idle);

        let plan = config.strategy.lookup(&Symbol::from("RAINFOREST_RESIN"));
        assert_eq!(plan.limit, Quantity(40));
        assert_eq!(
            plan.policy,
            &PolicyConfig::Pegged {
                buy_peg: Price(9998),
                sell_peg: Price(10002)
            }
        );
        // Explicit instrument table replaces the defaults
        assert!(!config.strategy.lookup(&Symbol::from("KELP")).configured);
    }

    #[test]
    fn test_from_file_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[diagnostics]\nmax_log_length = \"lots\"\n").unwrap();
        let err = AppConfig::from_file(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let config = AppConfig::load_with(path.to_str()).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/default.toml");
        let config = AppConfig::from_file(path).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_explicit_path_wins() {
        assert_eq!(AppConfig::resolve_path(Some("a.toml")), "a.toml");
    }

    #[test]
    fn test_config_serialization_round_trip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("max_log_length"));
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }
}
