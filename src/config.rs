use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATABASE: &str = "dishboard.db";

/// Server settings read from an optional YAML file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub database: String,
    pub cors_origin: Option<String>,
    pub log_level: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database: DEFAULT_DATABASE.to_string(),
            cors_origin: None,
            log_level: None,
        }
    }
}

/// Values given on the command line; `Some` wins over the file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub port: Option<u16>,
    pub database: Option<String>,
    pub cors_origin: Option<String>,
    pub log_level: Option<String>,
}

impl ServerConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse server config")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&content)
    }

    /// Load the file when given, otherwise defaults, then apply overrides
    pub fn load(path: Option<&Path>, overrides: ConfigOverrides) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(config.merge(overrides))
    }

    pub fn merge(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(database) = overrides.database {
            self.database = database;
        }
        if overrides.cors_origin.is_some() {
            self.cors_origin = overrides.cors_origin;
        }
        if overrides.log_level.is_some() {
            self.log_level = overrides.log_level;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_deserialize_partial_config() {
        let config = ServerConfig::from_yaml_str("port: 8080\ncors_origin: http://localhost:1420").unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.database, DEFAULT_DATABASE);
        assert_eq!(config.cors_origin.as_deref(), Some("http://localhost:1420"));
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_overrides_win() {
        let config = ServerConfig::from_yaml_str("port: 8080\ndatabase: file.db\nlog_level: warn")
            .unwrap()
            .merge(ConfigOverrides {
                port: Some(9000),
                log_level: Some("debug".to_string()),
                ..Default::default()
            });

        assert_eq!(config.port, 9000);
        assert_eq!(config.database, "file.db");
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "database: ':memory:'").unwrap();

        let config = ServerConfig::load(Some(file.path()), ConfigOverrides::default()).unwrap();
        assert_eq!(config.database, ":memory:");
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn test_load_without_file() {
        let config = ServerConfig::load(None, ConfigOverrides::default()).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(ServerConfig::from_yaml_str("port: [not a number]").is_err());
    }
}
