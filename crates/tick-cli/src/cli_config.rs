//! Persistent CLI configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tick_core::config::API_BASE_ENV_VAR;
use tick_core::util::normalize_text_option;
use tick_core::ApiConfig;

const CONFIG_FILE_NAME: &str = "cli-config.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliConfig {
    #[serde(default = "default_config_version")]
    pub version: u32,
    #[serde(default)]
    pub api_base_url: Option<String>,
}

const fn default_config_version() -> u32 {
    1
}

pub fn default_config_path() -> Result<PathBuf, String> {
    dirs::config_dir()
        .map(|dir| dir.join("tick").join(CONFIG_FILE_NAME))
        .ok_or_else(|| "Failed to resolve CLI config directory".to_string())
}

impl CliConfig {
    pub fn load() -> Result<Self, String> {
        Self::load_from_path(&default_config_path()?)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|error| format!("Failed to read config at {}: {}", path.display(), error))?;
        let mut config = serde_json::from_str::<Self>(&raw)
            .map_err(|error| format!("Failed to parse config at {}: {}", path.display(), error))?;
        config.normalize();
        Ok(config)
    }

    pub fn save(&self) -> Result<PathBuf, String> {
        let path = default_config_path()?;
        self.save_to_path(&path)?;
        Ok(path)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| {
                format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    error
                )
            })?;
        }

        let mut normalized = self.clone();
        normalized.normalize();
        let serialized = serde_json::to_string_pretty(&normalized)
            .map_err(|error| format!("Failed to serialize config: {error}"))?;
        std::fs::write(path, serialized)
            .map_err(|error| format!("Failed to write config at {}: {}", path.display(), error))
    }

    fn normalize(&mut self) {
        self.api_base_url = normalize_text_option(self.api_base_url.take())
            .map(|url| url.trim_end_matches('/').to_string());
    }
}

/// Flag, then `TICK_API_BASE`, then the config file, then the default.
pub fn resolve_api_config(
    flag: Option<String>,
    file: &CliConfig,
) -> Result<ApiConfig, tick_core::Error> {
    ApiConfig::resolve([
        flag,
        std::env::var(API_BASE_ENV_VAR).ok(),
        file.api_base_url.clone(),
    ])
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn config_path(dir: &TempDir) -> PathBuf {
        dir.path().join("tick").join(CONFIG_FILE_NAME)
    }

    #[test]
    fn config_roundtrip_normalizes_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_path(&dir);
        let config = CliConfig {
            version: 1,
            api_base_url: Some(" https://api.example.com/ ".to_string()),
        };

        config.save_to_path(&path).unwrap();
        let loaded = CliConfig::load_from_path(&path).unwrap();
        assert_eq!(
            loaded.api_base_url.as_deref(),
            Some("https://api.example.com")
        );
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = CliConfig::load_from_path(&config_path(&dir)).unwrap();
        assert_eq!(loaded.api_base_url, None);
    }

    #[test]
    fn invalid_json_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "{not json").unwrap();
        let error = CliConfig::load_from_path(&path).unwrap_err();
        assert!(error.contains("Failed to parse config"));
    }

    #[test]
    fn explicit_flag_wins_over_file() {
        let file = CliConfig {
            version: 1,
            api_base_url: Some("https://file.example.com".to_string()),
        };
        let resolved =
            resolve_api_config(Some("https://flag.example.com".to_string()), &file).unwrap();
        assert_eq!(resolved.base_url(), "https://flag.example.com");
    }
}
