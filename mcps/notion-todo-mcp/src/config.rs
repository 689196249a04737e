//! Configuration loading for notion-todo-mcp
//!
//! Configuration is loaded from:
//! 1. Environment variables NOTION_API_KEY, NOTION_DATABASE_ID, NOTION_BASE_URL
//! 2. The file named by NOTION_TODO_CONFIG_PATH
//! 3. ~/.binks/notion-todo.toml
//! 4. Default values
//!
//! The API key and database id have no defaults; without them the server
//! refuses to start.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that stop the server before it serves anything
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("NOTION_API_KEY is not set (environment or config file)")]
    MissingApiKey,

    #[error("NOTION_DATABASE_ID is not set (environment or config file)")]
    MissingDatabaseId,

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub notion: NotionConfig,
}

/// Notion API access
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotionConfig {
    /// Integration token, sent as a bearer credential
    #[serde(default)]
    pub api_key: String,
    /// The TODO database every tool operates on
    #[serde(default)]
    pub database_id: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Value of the Notion-Version header
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

fn default_base_url() -> String {
    "https://api.notion.com/v1".to_string()
}

fn default_api_version() -> String {
    "2022-06-28".to_string()
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            database_id: String::new(),
            base_url: default_base_url(),
            api_version: default_api_version(),
        }
    }
}

impl Config {
    /// Load configuration from the process environment and config file
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::find_config_path();
        Self::from_sources(path.as_deref(), |key| std::env::var(key).ok())
    }

    /// Build a validated config from an optional file and an env lookup
    ///
    /// A missing file is not an error; an unreadable or malformed one is.
    pub fn from_sources<F>(path: Option<&Path>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) if path.exists() => {
                tracing::info!("Loading config from: {}", path.display());
                let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                toml::from_str(&content).map_err(|source| ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            _ => {
                tracing::info!("Config file not found, using environment only");
                Self::default()
            }
        };

        let non_empty = |key: &str| env(key).filter(|v| !v.trim().is_empty());
        if let Some(key) = non_empty("NOTION_API_KEY") {
            config.notion.api_key = key;
        }
        if let Some(id) = non_empty("NOTION_DATABASE_ID") {
            config.notion.database_id = id;
        }
        if let Some(url) = non_empty("NOTION_BASE_URL") {
            config.notion.base_url = url;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.notion.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if self.notion.database_id.trim().is_empty() {
            return Err(ConfigError::MissingDatabaseId);
        }
        Ok(())
    }

    fn find_config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("NOTION_TODO_CONFIG_PATH") {
            return Some(PathBuf::from(path));
        }

        dirs::home_dir().map(|home| home.join(".binks").join("notion-todo.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_only() {
        let config = Config::from_sources(
            None,
            env_of(&[("NOTION_API_KEY", "secret"), ("NOTION_DATABASE_ID", "db-1")]),
        )
        .unwrap();
        assert_eq!(config.notion.api_key, "secret");
        assert_eq!(config.notion.database_id, "db-1");
        assert_eq!(config.notion.base_url, "https://api.notion.com/v1");
        assert_eq!(config.notion.api_version, "2022-06-28");
    }

    #[test]
    fn test_missing_credentials_are_fatal() {
        let err = Config::from_sources(None, env_of(&[("NOTION_DATABASE_ID", "db-1")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));

        let err = Config::from_sources(None, env_of(&[("NOTION_API_KEY", "secret")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingDatabaseId));

        let err = Config::from_sources(
            None,
            env_of(&[("NOTION_API_KEY", "  "), ("NOTION_DATABASE_ID", "db-1")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));
    }

    #[test]
    fn test_file_values_are_overridden_by_env() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[notion]\napi_key = \"from-file\"\ndatabase_id = \"file-db\"\nbase_url = \"http://localhost:9999\""
        )
        .unwrap();

        let config = Config::from_sources(
            Some(file.path()),
            env_of(&[("NOTION_DATABASE_ID", "env-db")]),
        )
        .unwrap();
        assert_eq!(config.notion.api_key, "from-file");
        assert_eq!(config.notion.database_id, "env-db");
        assert_eq!(config.notion.base_url, "http://localhost:9999");
    }

    #[test]
    fn test_malformed_file_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[notion\napi_key = ").unwrap();

        let err = Config::from_sources(Some(file.path()), env_of(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
