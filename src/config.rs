//! Configuration Management
//!
//! Handles persistent configuration storage for ccloud. Values resolve in
//! the order: command line, `CONFLUENT_CLOUD_*` environment variables,
//! config file, built-in default.

use crate::confluent::auth::{Credentials, API_KEY_ENV, API_SECRET_ENV, ENDPOINT_ENV};
use crate::confluent::client::{ClientConfig, DEFAULT_ENDPOINT};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Cloud API key
    #[serde(default)]
    pub api_key: Option<String>,
    /// Cloud API secret
    #[serde(default)]
    pub api_secret: Option<String>,
    /// Control-plane endpoint override
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Default environment for cluster commands
    #[serde(default)]
    pub environment: Option<String>,
}

/// First candidate that is present and not blank
fn first_non_empty<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ccloud").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from a specific file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;

        Ok(())
    }

    /// Get effective credentials (CLI > env > config)
    pub fn effective_credentials(
        &self,
        api_key: Option<String>,
        api_secret: Option<String>,
    ) -> Result<Credentials> {
        let api_key = first_non_empty([api_key, env_var(API_KEY_ENV), self.api_key.clone()]);
        let api_secret =
            first_non_empty([api_secret, env_var(API_SECRET_ENV), self.api_secret.clone()]);

        Credentials::resolve(api_key, api_secret).with_context(|| {
            format!(
                "No Confluent Cloud credentials. Set {} and {} or use --api-key/--api-secret",
                API_KEY_ENV, API_SECRET_ENV
            )
        })
    }

    /// Get effective endpoint (CLI > env > config > default)
    pub fn effective_endpoint(&self, endpoint: Option<String>) -> String {
        first_non_empty([endpoint, env_var(ENDPOINT_ENV), self.endpoint.clone()])
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
    }

    /// Get effective environment (CLI > config)
    pub fn effective_environment(&self, environment: Option<String>) -> Option<String> {
        first_non_empty([environment, self.environment.clone()])
    }

    /// Build the client transport settings
    pub fn client_config(&self, endpoint: Option<String>, timeout: Option<Duration>) -> ClientConfig {
        ClientConfig {
            endpoint: self.effective_endpoint(endpoint),
            timeout,
            ..Default::default()
        }
    }

    /// Set default environment and save
    pub fn set_environment(&mut self, environment: &str) -> Result<()> {
        self.environment = Some(environment.to_string());
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("ccloud-config-test-{}-{}", std::process::id(), name))
            .join("config.json")
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let config = Config::load_from(&temp_config_path("missing"));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_reload() {
        let path = temp_config_path("roundtrip");
        let config = Config {
            api_key: Some("KEY".to_string()),
            environment: Some("env-123".to_string()),
            ..Default::default()
        };

        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path), config);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_corrupt_file_loads_defaults() {
        let path = temp_config_path("corrupt");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();

        assert_eq!(Config::load_from(&path), Config::default());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_first_non_empty_precedence() {
        assert_eq!(
            first_non_empty([None, Some("".to_string()), Some("file".to_string())]),
            Some("file".to_string())
        );
        assert_eq!(
            first_non_empty([Some("cli".to_string()), Some("env".to_string())]),
            Some("cli".to_string())
        );
        assert_eq!(first_non_empty::<2>([None, None]), None);
    }

    #[test]
    fn test_command_line_wins() {
        let config = Config {
            endpoint: Some("https://file.example".to_string()),
            environment: Some("env-file".to_string()),
            ..Default::default()
        };

        assert_eq!(
            config.effective_endpoint(Some("https://cli.example".to_string())),
            "https://cli.example"
        );
        assert_eq!(
            config.effective_environment(Some("env-cli".to_string())),
            Some("env-cli".to_string())
        );
        assert_eq!(config.effective_environment(None), Some("env-file".to_string()));

        let creds = config
            .effective_credentials(Some("cli-key".to_string()), Some("cli-secret".to_string()))
            .unwrap();
        assert_eq!(creds.api_key(), "cli-key");
    }
}
