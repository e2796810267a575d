// src/core/config_manager.rs
//! Unified configuration management: defaults, optional `config.yaml`, then env

use anyhow::{Context, Result};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

use crate::app_log;

const DEFAULT_CONFIG_FILE: &str = "config.yaml";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_SECRET: &str = "a_default_secret_key_for_dev";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";
const MAX_UPLOAD_MB_LIMIT: u64 = 1024;

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub server: ServerSettings,
    pub gemini: GeminiConfig,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub address: String,
    pub port: u16,
    pub secret_key: String,
    pub max_upload_mb: u64,
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_seconds: u64,
}

/// Shape of `config.yaml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    server: ServerSection,
    gemini: GeminiSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ServerSection {
    address: Option<String>,
    port: Option<u16>,
    secret_key: Option<String>,
    max_upload_mb: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GeminiSection {
    api_key: Option<String>,
    model: Option<String>,
    base_url: Option<String>,
    timeout_seconds: Option<u64>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                address: "0.0.0.0".to_string(),
                port: DEFAULT_PORT,
                secret_key: DEFAULT_SECRET.to_string(),
                max_upload_mb: 10,
            },
            gemini: GeminiConfig {
                api_key: None,
                model: DEFAULT_MODEL.to_string(),
                base_url: DEFAULT_GEMINI_URL.to_string(),
                timeout_seconds: 120,
            },
        }
    }
}

impl ConfigManager {
    /// Load all configuration: defaults, then the YAML file, then environment
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("RESUME_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        let mut config = Self::from_file(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok())?;

        if config.gemini.api_key.is_none() {
            app_log!(
                warn,
                "GEMINI_API_KEY is not set, every analysis will return an error report"
            );
        }

        Ok(config)
    }

    /// Defaults overlaid with `path` when it exists
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut config = Self::default();

        if !path.exists() {
            app_log!(debug, "No config file at {}, using defaults", path.display());
            return Ok(config);
        }

        app_log!(info, "Loading configuration from {}", path.display());
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let file: ConfigFile = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        config.apply_file(file)?;
        Ok(config)
    }

    fn apply_file(&mut self, file: ConfigFile) -> Result<()> {
        let ConfigFile { server, gemini } = file;

        if let Some(address) = server.address {
            self.server.address = address;
        }
        if let Some(port) = server.port {
            self.server.port = port;
        }
        if let Some(secret) = server.secret_key {
            self.server.secret_key = secret;
        }
        if let Some(mb) = server.max_upload_mb {
            self.server.max_upload_mb = check_upload_limit(mb)?;
        }

        if gemini.api_key.is_some() {
            self.gemini.api_key = gemini.api_key;
        }
        if let Some(model) = gemini.model {
            self.gemini.model = normalize_model_name(&model);
        }
        if let Some(url) = gemini.base_url {
            self.gemini.base_url = url;
        }
        if let Some(timeout) = gemini.timeout_seconds {
            self.gemini.timeout_seconds = timeout;
        }

        Ok(())
    }

    /// Apply environment overrides. `lookup` is injectable for tests.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("RESUME_PORT").or_else(|| lookup("ROCKET_PORT")) {
            self.server.port = port
                .parse::<u16>()
                .map_err(|_| anyhow::anyhow!("Port must be a valid port number: {}", port))?;
        }
        if let Some(address) = lookup("RESUME_ADDRESS") {
            self.server.address = address;
        }
        if let Some(secret) = lookup("RESUME_SECRET_KEY") {
            self.server.secret_key = secret;
        }
        if let Some(mb) = lookup("RESUME_MAX_UPLOAD_MB") {
            let parsed = mb
                .parse()
                .with_context(|| format!("RESUME_MAX_UPLOAD_MB is not a number: {}", mb))?;
            self.server.max_upload_mb = check_upload_limit(parsed)?;
        }

        if let Some(key) = lookup("GEMINI_API_KEY").filter(|k| !k.trim().is_empty()) {
            self.gemini.api_key = Some(key);
        }
        if let Some(model) = lookup("GEMINI_MODEL") {
            self.gemini.model = normalize_model_name(&model);
        }
        if let Some(url) = lookup("GEMINI_API_URL") {
            self.gemini.base_url = url;
        }

        Ok(())
    }

    /// Hex-encoded 256-bit key derived from the configured passphrase
    pub fn cookie_secret(&self) -> String {
        format!("{:x}", Sha256::digest(self.server.secret_key.as_bytes()))
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.server.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

fn check_upload_limit(mb: u64) -> Result<u64> {
    if mb == 0 || mb > MAX_UPLOAD_MB_LIMIT {
        anyhow::bail!(
            "max_upload_mb must be between 1 and {}, got {}",
            MAX_UPLOAD_MB_LIMIT,
            mb
        );
    }
    Ok(mb)
}

/// `models/gemini-2.5-flash` and `gemini-2.5-flash` name the same model
pub fn normalize_model_name(model: &str) -> String {
    model.trim().trim_start_matches("models/").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let config = ConfigManager::from_file(Path::new("/nonexistent/config.yaml")).unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.gemini.model, "gemini-2.5-flash");
        assert!(config.gemini.api_key.is_none());
        assert_eq!(config.max_upload_bytes(), 10 * 1024 * 1024);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "server:\n  port: 8080\n  max_upload_mb: 2\ngemini:\n  model: models/gemini-pro\n"
        )
        .unwrap();

        let config = ConfigManager::from_file(file.path()).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.max_upload_mb, 2);
        assert_eq!(config.gemini.model, "gemini-pro");
        assert_eq!(config.server.address, "0.0.0.0");
    }

    #[test]
    fn test_upload_limit_out_of_range() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server:\n  max_upload_mb: 18446744073709551615\n").unwrap();
        let err = ConfigManager::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("max_upload_mb"));

        let mut config = ConfigManager::default();
        assert!(config
            .apply_env(|k| (k == "RESUME_MAX_UPLOAD_MB").then(|| "0".to_string()))
            .is_err());
        assert_eq!(config.server.max_upload_mb, 10);

        config.server.max_upload_mb = u64::MAX;
        assert_eq!(config.max_upload_bytes(), u64::MAX);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server: [unclosed").unwrap();
        assert!(ConfigManager::from_file(file.path()).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("ROCKET_PORT", "9000"),
            ("GEMINI_API_KEY", "secret"),
            ("GEMINI_MODEL", "models/gemini-2.5-pro"),
        ]
        .into_iter()
        .collect();

        let mut config = ConfigManager::default();
        config
            .apply_env(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.gemini.api_key.as_deref(), Some("secret"));
        assert_eq!(config.gemini.model, "gemini-2.5-pro");
    }

    #[test]
    fn test_blank_api_key_ignored_and_bad_port_rejected() {
        let mut config = ConfigManager::default();
        config
            .apply_env(|k| (k == "GEMINI_API_KEY").then(|| "  ".to_string()))
            .unwrap();
        assert!(config.gemini.api_key.is_none());

        let result = config.apply_env(|k| (k == "RESUME_PORT").then(|| "http".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_cookie_secret_is_256_bit_hex() {
        let secret = ConfigManager::default().cookie_secret();
        assert_eq!(secret.len(), 64);
        assert!(secret.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
