//! Service configuration.
//!
//! Values come from an optional YAML file named by `MARITIME_CONFIG`, then
//! environment overrides:
//!
//! - `MARITIME_DB` — SQLite database path (default: `maritime_data.db`)
//! - `MARITIME_BIND` — full bind address (default: `0.0.0.0:8080`)
//! - `PORT` — port only, combined with host `0.0.0.0`
//! - `MARITIME_INTENT_ORDER` — comma-separated routing order
//! - `MARITIME_EXTRACTION` — `legacy` (default) or `corrected`

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::query::intent::IntentKind;
use crate::query::router::{IntentRouter, RouteError};
use crate::query::slots::ExtractionMode;
use crate::storage::SqliteVesselStore;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },

    #[error(transparent)]
    Route(#[from] RouteError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub bind_addr: String,
    pub intent_order: Vec<IntentKind>,
    pub extraction: ExtractionMode,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("maritime_data.db"),
            bind_addr: "0.0.0.0:8080".to_string(),
            intent_order: IntentKind::DEFAULT_ORDER.to_vec(),
            extraction: ExtractionMode::Legacy,
        }
    }
}

impl AppConfig {
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    /// File (if `MARITIME_CONFIG` is set) plus process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var("MARITIME_CONFIG") {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("MARITIME_DB") {
            self.database_path = PathBuf::from(path);
        }

        if let Some(bind) = lookup("MARITIME_BIND") {
            self.bind_addr = bind;
        } else if let Some(port) = lookup("PORT") {
            let port: u16 = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT",
                message: format!("'{}' is not a port number", port),
            })?;
            self.bind_addr = format!("0.0.0.0:{}", port);
        }

        if let Some(order) = lookup("MARITIME_INTENT_ORDER") {
            self.intent_order = order
                .split(',')
                .filter(|part| !part.trim().is_empty())
                .map(|part| part.parse::<IntentKind>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|message| ConfigError::InvalidValue {
                    key: "MARITIME_INTENT_ORDER",
                    message,
                })?;
        }

        if let Some(mode) = lookup("MARITIME_EXTRACTION") {
            self.extraction = match mode.trim() {
                "legacy" => ExtractionMode::Legacy,
                "corrected" => ExtractionMode::Corrected,
                other => {
                    return Err(ConfigError::InvalidValue {
                        key: "MARITIME_EXTRACTION",
                        message: format!("expected 'legacy' or 'corrected', got '{}'", other),
                    })
                }
            };
        }

        Ok(())
    }

    pub fn router(&self) -> Result<IntentRouter, ConfigError> {
        Ok(IntentRouter::with_order(&self.intent_order)?.with_mode(self.extraction))
    }

    pub fn store(&self) -> SqliteVesselStore {
        SqliteVesselStore::new(&self.database_path)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.database_path, PathBuf::from("maritime_data.db"));
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.router().unwrap().order(), IntentKind::DEFAULT_ORDER.to_vec());
    }

    #[test]
    fn test_yaml_partial() {
        let config = AppConfig::from_yaml(
            "database_path: /var/lib/maritime/vessels.db\nextraction: corrected\nintent_order: [flag, status]\n",
        )
        .unwrap();
        assert_eq!(config.database_path, PathBuf::from("/var/lib/maritime/vessels.db"));
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.extraction, ExtractionMode::Corrected);
        assert_eq!(config.intent_order, vec![IntentKind::Flag, IntentKind::Status]);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("maritime.yaml");
        std::fs::write(&path, "bind_addr: 127.0.0.1:9000\n").unwrap();
        assert_eq!(AppConfig::from_file(&path).unwrap().bind_addr, "127.0.0.1:9000");
        assert!(matches!(
            AppConfig::from_file(&dir.path().join("absent.yaml")),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config
            .apply_env(env(&[
                ("MARITIME_DB", "/tmp/v.db"),
                ("PORT", "3000"),
                ("MARITIME_INTENT_ORDER", "owner, speed_range,flag"),
                ("MARITIME_EXTRACTION", "corrected"),
            ]))
            .unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/v.db"));
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(
            config.intent_order,
            vec![IntentKind::Owner, IntentKind::SpeedRange, IntentKind::Flag]
        );
        assert_eq!(config.router().unwrap().mode(), ExtractionMode::Corrected);
    }

    #[test]
    fn test_bind_wins_over_port() {
        let mut config = AppConfig::default();
        config
            .apply_env(env(&[("MARITIME_BIND", "127.0.0.1:1234"), ("PORT", "3000")]))
            .unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:1234");
    }

    #[test]
    fn test_invalid_values() {
        let mut config = AppConfig::default();
        assert!(config.apply_env(env(&[("PORT", "eighty")])).is_err());
        assert!(config.apply_env(env(&[("MARITIME_INTENT_ORDER", "owner,weather")])).is_err());
        assert!(config.apply_env(env(&[("MARITIME_EXTRACTION", "fixed")])).is_err());
    }

    #[test]
    fn test_duplicate_order_is_config_error() {
        let config = AppConfig {
            intent_order: vec![IntentKind::Owner, IntentKind::Owner],
            ..AppConfig::default()
        };
        assert!(matches!(config.router(), Err(ConfigError::Route(_))));
    }
}
