//! Application configuration: a YAML file in the platform config directory
//! with environment-variable overrides for secrets.

use anyhow::Result;
use log::info;
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub auth: AuthServiceConfig,
    pub vision: VisionConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Base directory for the CSV backend; platform data dir when unset
    pub data_dir: Option<PathBuf>,
    /// Base URL of the remote document store
    pub remote_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Csv,
            data_dir: None,
            remote_url: "http://localhost:8081".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Remote,
    Csv,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Remote => "remote",
            StorageBackend::Csv => "csv",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthServiceConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://identitytoolkit.googleapis.com".to_string(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-1.5-flash".to_string(),
            api_key: None,
        }
    }
}

impl AppConfig {
    /// Load the config file, falling back to defaults when it is missing.
    /// API keys can always be supplied through the environment.
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_file_path() {
            Some(path) if path.exists() => {
                info!("Loading config from {}", path.display());
                serde_yaml::from_str(&fs::read_to_string(&path)?)?
            }
            _ => {
                info!("No config file found, using defaults");
                Self::default()
            }
        };

        if let Ok(key) = std::env::var("EXPENSE_TRACKER_AUTH_API_KEY") {
            config.auth.api_key = Some(key);
        }
        if let Ok(key) = std::env::var("EXPENSE_TRACKER_VISION_API_KEY") {
            config.vision.api_key = Some(key);
        }

        Ok(config)
    }

    pub fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("expense-tracker").join("config.yaml"))
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.server.host, self.server.port).parse()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.storage.backend, StorageBackend::Csv);
        assert!(config.auth.api_key.is_none());
        assert_eq!(config.vision.model, "gemini-1.5-flash");
    }

    #[test]
    fn test_partial_yaml_fills_in_defaults() {
        let yaml = "\
server:
  port: 4000
storage:
  backend: remote
  remote_url: https://store.example.com
";
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.storage.backend, StorageBackend::Remote);
        assert_eq!(config.storage.remote_url, "https://store.example.com");
        assert_eq!(config.vision.model, "gemini-1.5-flash");
    }

    #[test]
    fn test_socket_addr() {
        let config = AppConfig::default();
        assert_eq!(config.socket_addr().unwrap().port(), 3000);
    }
}
