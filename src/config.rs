use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Client configuration, read from a TOML file in the user config
/// directory with environment-variable overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the notes server
    pub server_url: String,
    /// Bearer token for API requests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8080".to_string(),
            token: None,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Could not determine the user config directory")]
    NoConfigDir,
}

impl ClientConfig {
    /// Default config file location (e.g. `~/.config/batnoter/config.toml`).
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|d| d.join("batnoter").join("config.toml"))
            .ok_or(ConfigError::NoConfigDir)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Load from the given path when it exists, falling back to defaults,
    /// then apply `BATNOTER_SERVER_URL` and `BATNOTER_TOKEN` overrides.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            Self::load(path)?
        } else {
            Self::default()
        };
        if let Ok(url) = std::env::var("BATNOTER_SERVER_URL") {
            config.server_url = url;
        }
        if let Ok(token) = std::env::var("BATNOTER_TOKEN") {
            config.token = Some(token);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = ClientConfig {
            server_url: "https://notes.example.com".to_string(),
            token: Some("secret".to_string()),
        };
        config.save(&path).unwrap();

        let loaded = ClientConfig::load(&path).unwrap();
        assert_eq!(loaded.server_url, "https://notes.example.com");
        assert_eq!(loaded.token.as_deref(), Some("secret"));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ClientConfig::load(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_or_default_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.server_url, ClientConfig::default().server_url);
    }
}
