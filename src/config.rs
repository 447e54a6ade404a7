#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_global_config_default() {
        let config = GlobalConfig::default();

        assert_eq!(config.daemon.port, 11434);
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.file_enabled);
    }

    #[test]
    fn test_global_config_serialization() {
        let config = GlobalConfig::default();

        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("[daemon]"));
        assert!(toml_str.contains("[logging]"));

        let deserialized: GlobalConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.daemon.port, deserialized.daemon.port);
    }

    #[test]
    fn test_config_validation() {
        let mut config = GlobalConfig::default();
        assert!(config.validate().is_ok());

        config.daemon.port = 0;
        assert!(config.validate().is_err());
    }

    #[tokio::test]
    async fn test_global_config_load_default_when_missing() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let config = GlobalConfig::load_from_path(&config_path).await.unwrap();

        // Should be default config when file doesn't exist
        assert_eq!(config.daemon.port, 11434);
    }

    #[tokio::test]
    async fn test_global_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let mut config = GlobalConfig::default();
        config.daemon.port = 8080;
        config.logging.level = "debug".to_string();

        config.save_to_path(&config_path).await.unwrap();

        let loaded = GlobalConfig::load_from_path(&config_path).await.unwrap();
        assert_eq!(loaded.daemon.port, 8080);
        assert_eq!(loaded.logging.level, "debug");
    }

    #[tokio::test]
    async fn test_global_config_partial_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let partial_config = r#"
[daemon]
port = 9090
"#;

        tokio::fs::write(&config_path, partial_config)
            .await
            .unwrap();

        let config = GlobalConfig::load_from_path(&config_path).await.unwrap();

        assert_eq!(config.daemon.port, 9090);

        // Unspecified sections fall back to defaults
        assert_eq!(config.logging.level, "info");
    }
}

use crate::error::{OllamactlError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default port the Ollama daemon listens on.
pub const DEFAULT_PORT: u16 = 11434;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GlobalConfig {
    #[serde(default)]
    pub daemon: DaemonConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// TCP port the managed daemon is served on.
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String, // "trace", "debug", "info", "warn", "error"
    #[serde(default)]
    pub file_enabled: bool,
    pub file_path: Option<String>, // If None, uses default ~/.ollamactl/logs/
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_enabled: false,
            file_path: None,
        }
    }
}

/// Get the ollamactl home directory (~/.ollamactl)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| OllamactlError::ConfigError("HOME environment variable not set".to_string()))?;
    Ok(PathBuf::from(home).join(".ollamactl"))
}

/// Default path of the configuration file (~/.ollamactl/config.toml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.toml"))
}

impl GlobalConfig {
    pub async fn load() -> Result<Self> {
        let path = get_config_path()?;
        Self::load_from_path(&path).await
    }

    /// Load configuration from a specific path, falling back to defaults
    /// when the file does not exist.
    pub async fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config: GlobalConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub async fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| OllamactlError::ConfigError(format!("Failed to serialize config: {e}")))?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.daemon.port == 0 {
            return Err(OllamactlError::ConfigError(
                "daemon port must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}
